use crate::rules::{FLAT_SHEET_TYPE, GENERIC_TUBE_TYPE, MappingRule, UNKNOWN_TYPE};

/// Mapping rules prepared for repeated classification.
///
/// Rules stay in their original order: the first fragment found in a
/// description decides its type, later rules with the same or overlapping
/// fragments are shadowed.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    rules: Vec<(String, String)>,
}

impl TypeMapping {
    pub fn new(rules: &[MappingRule]) -> Self {
        Self {
            rules: rules
                .iter()
                // A blank fragment would match every description.
                .filter(|r| !r.text_fragment.trim().is_empty())
                .map(|r| (r.text_fragment.to_uppercase(), r.type_label.clone()))
                .collect(),
        }
    }

    pub fn classify(&self, description: &str) -> &str {
        let upper = description.to_uppercase();

        if let Some((_, label)) = self
            .rules
            .iter()
            .find(|(fragment, _)| upper.contains(fragment.as_str()))
        {
            return label;
        }

        if upper.contains("TUBO") {
            GENERIC_TUBE_TYPE
        } else if upper.contains("CHAPA") {
            FLAT_SHEET_TYPE
        } else {
            UNKNOWN_TYPE
        }
    }
}

/// Classify a single description against an ordered rule list.
pub fn classify(description: &str, rules: &[MappingRule]) -> String {
    TypeMapping::new(rules).classify(description).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(fragment: &str, label: &str) -> MappingRule {
        MappingRule {
            text_fragment: fragment.to_string(),
            type_label: label.to_string(),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let rules = [rule("A", "X"), rule("AB", "Y")];
        assert_eq!(classify("ABC", &rules), "X");
    }

    #[test]
    fn test_duplicate_fragment_is_shadowed() {
        let rules = [rule("chapa", "CH_PLANA"), rule("CHAPA", "CONJUNTO")];
        assert_eq!(classify("Chapa 3mm 100x200", &rules), "CH_PLANA");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let rules = [rule("Pé Condutor 330", "CONJUNTO")];
        assert_eq!(classify("PÉ CONDUTOR 330 EXTRA", &rules), "CONJUNTO");
        assert_eq!(classify("pé condutor 330", &rules), "CONJUNTO");
    }

    #[test]
    fn test_fallbacks() {
        let rules = [rule("Leito", "CONJUNTO")];
        assert_eq!(classify("Tubo avulso 30x30", &rules), GENERIC_TUBE_TYPE);
        assert_eq!(classify("chapa dobrada 100x100", &rules), FLAT_SHEET_TYPE);
        assert_eq!(classify("Parafuso M8", &rules), UNKNOWN_TYPE);
    }

    #[test]
    fn test_tube_fallback_before_sheet_fallback() {
        assert_eq!(classify("Tubo sobre chapa", &[]), GENERIC_TUBE_TYPE);
    }

    #[test]
    fn test_empty_description() {
        let rules = [rule("A", "X")];
        assert_eq!(classify("", &rules), UNKNOWN_TYPE);
    }

    #[test]
    fn test_blank_fragment_never_matches() {
        let rules = [rule("  ", "X"), rule("Tubo", "tubo 50x50")];
        assert_eq!(classify("Tubo Frontal", &rules), "tubo 50x50");
        assert_eq!(classify("Parafuso", &rules), UNKNOWN_TYPE);
    }
}
