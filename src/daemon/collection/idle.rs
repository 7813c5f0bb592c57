/// Decides whether an idle duration still counts as the user being present.
pub struct IdleClassifier {
    threshold_seconds: u32,
}

impl IdleClassifier {
    pub fn from_seconds(threshold_seconds: u32) -> Self {
        Self { threshold_seconds }
    }

    pub fn threshold_seconds(&self) -> u32 {
        self.threshold_seconds
    }

    /// Idle time equal to the threshold already counts as inactive.
    pub fn is_active(&self, idle_seconds: f64) -> bool {
        idle_seconds < self.threshold_seconds as f64
    }
}

#[cfg(test)]
mod tests {
    use super::IdleClassifier;

    #[test]
    fn test_threshold_boundary() {
        let classifier = IdleClassifier::from_seconds(60);
        assert!(classifier.is_active(59.0));
        assert!(!classifier.is_active(60.0));
        assert!(!classifier.is_active(61.0));
    }

    #[test]
    fn test_zero_idle_is_active() {
        assert!(IdleClassifier::from_seconds(60).is_active(0.0));
    }
}
