use serde::{Deserialize, Serialize};

/// One labelled slice of a dataset, carrying its target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueItem {
    pub key: u32,
    pub label: String,
    pub value: f64,
    pub color: String,
}

impl ValueItem {
    pub fn new(key: u32, label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            value,
            color: color.into(),
        }
    }

    /// Caption shown under the label when the slice is highlighted.
    pub fn caption(&self) -> String {
        format!("{} itens", self.value)
    }

    pub fn with_animated_value(&self, value: f64) -> RenderItem {
        RenderItem {
            key: self.key,
            label: self.label.clone(),
            value,
            color: self.color.clone(),
        }
    }
}

/// Item handed to the chart renderer, with the animated value in place of the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub key: u32,
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_item_keeps_identity_and_swaps_value() {
        let item = ValueItem::new(2, "Vencidos", 10.0, "#EB5757");
        let rendered = item.with_animated_value(4.0);
        assert_eq!(rendered.key, 2);
        assert_eq!(rendered.label, "Vencidos");
        assert_eq!(rendered.color, "#EB5757");
        assert_eq!(rendered.value, 4.0);
    }

    #[test]
    fn caption_reports_target_value() {
        let item = ValueItem::new(1, "Válidos", 40.0, "#6FCF97");
        assert_eq!(item.caption(), "40 itens");
    }
}
