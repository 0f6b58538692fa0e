// Kanji-Parts Character Details
// Per-character information: code point, readings, parts and region membership

use crate::store::DecompositionStore;

/// Everything the tables know about one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetails {
    pub symbol: String,

    /// Code point label, e.g. "U+6C60"
    pub code_point: String,

    pub on_readings: Vec<String>,
    pub kun_readings: Vec<String>,

    /// Immediate components from the direct table
    pub parts: Vec<String>,

    pub standard: bool,

    /// Modern form, when the character is a historical form
    pub modern_form: Option<String>,
}

impl CharacterDetails {
    /// Look a character up; unknown characters get empty details
    pub fn lookup(store: &DecompositionStore, symbol: &str) -> Self {
        let readings = store.standard_entry(symbol).map(|e| &e.yomi);
        Self {
            symbol: symbol.to_string(),
            code_point: code_point_label(symbol),
            on_readings: readings.map(|r| r.on_yomi.clone()).unwrap_or_default(),
            kun_readings: readings.map(|r| r.kun_yomi.clone()).unwrap_or_default(),
            parts: store.direct(symbol).map(<[String]>::to_vec).unwrap_or_default(),
            standard: store.regions().is_standard(symbol),
            modern_form: store.regions().modern_form(symbol).map(str::to_string),
        }
    }
}

/// "U+XXXX" label of the first code point, at least four hex digits
pub fn code_point_label(symbol: &str) -> String {
    match symbol.chars().next() {
        Some(ch) => format!("U+{:04X}", ch as u32),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixture, Readings, StandardEntry};

    #[test]
    fn test_code_point_label() {
        assert_eq!(code_point_label("池"), "U+6C60");
        assert_eq!(code_point_label("𠂉"), "U+20089");
        assert_eq!(code_point_label("A"), "U+0041");
        assert_eq!(code_point_label(""), "");
    }

    #[test]
    fn test_lookup_standard_character() {
        let mut tables = fixture();
        tables.standard.push(StandardEntry {
            symbol: "湖".into(),
            yomi: Readings {
                on_yomi: vec!["コ".into()],
                kun_yomi: vec!["みずうみ".into()],
            },
        });
        tables
            .direct
            .insert("湖".into(), vec!["氵".into(), "胡".into()]);
        let store = DecompositionStore::new(tables);

        let details = CharacterDetails::lookup(&store, "湖");
        assert_eq!(details.code_point, "U+6E56");
        assert_eq!(details.on_readings, vec!["コ"]);
        assert_eq!(details.kun_readings, vec!["みずうみ"]);
        assert_eq!(details.parts, vec!["氵", "胡"]);
        assert!(details.standard);
        assert_eq!(details.modern_form, None);
    }

    #[test]
    fn test_lookup_historical_character() {
        let store = DecompositionStore::new(fixture());
        let details = CharacterDetails::lookup(&store, "沒");

        assert!(!details.standard);
        assert_eq!(details.modern_form.as_deref(), Some("没"));
        assert!(details.on_readings.is_empty());
    }

    #[test]
    fn test_lookup_unknown_character() {
        let store = DecompositionStore::new(fixture());
        let details = CharacterDetails::lookup(&store, "龘");

        assert!(details.parts.is_empty());
        assert!(!details.standard);
        assert_eq!(details.code_point, "U+9F98");
    }
}
