#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionLabel {
    pub label: String,
    pub description: String,
}

/// Label and description text keyed by class index.
#[derive(Debug, Clone)]
pub struct LabelTable {
    entries: Vec<ConditionLabel>,
}

impl LabelTable {
    pub fn new(entries: Vec<ConditionLabel>) -> Self {
        Self { entries }
    }

    /// The seven conditions the production classifier was trained on.
    pub fn respiratory() -> Self {
        const ENTRIES: [(&str, &str); 7] = [
            (
                "Healthy / Normal",
                "No abnormal sounds detected. Breathing appears normal.",
            ),
            (
                "Asthma",
                "Asthma detected : May cause wheezing and shortness of breath.",
            ),
            (
                "Bronchiectasis",
                "Bronchiectasis detected : Chronic cough and mucus production.",
            ),
            (
                "Bronchiolitis",
                "Bronchiolitis detected : Often viral, common in children.",
            ),
            (
                "COPD",
                "COPD detected : Airflow obstruction with chronic cough/wheezing.",
            ),
            (
                "LRTI (Lower Respiratory Tract Infection)",
                "LRTI detected : Includes bronchitis and lower airway infections.",
            ),
            (
                "Pneumonia",
                "Pneumonia detected : Infection causing crackles, cough, and fever.",
            ),
        ];

        Self::new(
            ENTRIES
                .iter()
                .map(|(label, description)| ConditionLabel {
                    label: label.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> Option<&ConditionLabel> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::respiratory()
    }
}
