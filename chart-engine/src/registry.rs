//! FILENAME: chart-engine/src/registry.rs
//! PURPOSE: Tracks the chart whose tooltip is currently open.
//! CONTEXT: On touch devices a tooltip stays open after a tap. Tapping a
//! different chart must dismiss the tooltip of the previously tapped one.
//! The registry is owned by the host page and passed to whoever handles taps.

use log::debug;

use crate::definition::ChartId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveChartRegistry {
    active: Option<ChartId>,
}

impl ActiveChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ChartId> {
        self.active
    }

    /// Marks `id` as the tapped chart. Returns the previously active chart
    /// whose tooltip must now be dismissed, if it is a different one.
    pub fn activate(&mut self, id: ChartId) -> Option<ChartId> {
        match self.active.replace(id) {
            Some(previous) if previous != id => {
                debug!("Chart {} activated, dismissing tooltip of chart {}", id, previous);
                Some(previous)
            }
            _ => None,
        }
    }

    /// Forgets `id` when that chart is unmounted.
    pub fn clear(&mut self, id: ChartId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_reports_previous_chart() {
        let mut registry = ActiveChartRegistry::new();
        assert_eq!(registry.activate(1), None);
        assert_eq!(registry.activate(1), None);
        assert_eq!(registry.activate(2), Some(1));
        assert_eq!(registry.active(), Some(2));
    }

    #[test]
    fn test_clear_only_forgets_matching_chart() {
        let mut registry = ActiveChartRegistry::new();
        registry.activate(3);
        registry.clear(4);
        assert_eq!(registry.active(), Some(3));
        registry.clear(3);
        assert_eq!(registry.active(), None);
        assert_eq!(registry.activate(4), None);
    }
}
