use log::info;

/// Tags every pipeline log line with the stage it came from, so the four
/// stages of one run can be told apart in interleaved output.
pub struct LogManager {
    stage: &'static str,
}

impl LogManager {
    pub fn for_stage(stage: &'static str) -> Self {
        Self { stage }
    }

    pub fn record(&self, message: &str) {
        info!("{}", self.line(message));
    }

    fn line(&self, message: &str) -> String {
        format!("[{}] {}", self.stage, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lines_carry_the_stage_tag() {
        let logger = LogManager::for_stage("gate-reducer");
        assert_eq!(
            logger.line("reduced 3 pulses"),
            "[gate-reducer] reduced 3 pulses"
        );
    }

    #[test]
    fn each_stage_keeps_its_own_tag() {
        let decoder = LogManager::for_stage("pulse-decoder");
        let encoder = LogManager::for_stage("result-encoder");
        assert_ne!(decoder.line("done"), encoder.line("done"));
    }
}
