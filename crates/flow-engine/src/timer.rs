/// Elapsed-time tracker.
///
/// The engine never reads a clock; hosts deliver one tick per elapsed
/// second and the tracker counts while switched on.
#[derive(Debug, Clone, Default)]
pub struct FlowTimer {
    on: bool,
    seconds: u64,
}

impl FlowTimer {
    pub fn start(&mut self) {
        self.on = true;
    }

    pub fn stop(&mut self) {
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Advance by one second; returns the new reading while running.
    pub fn tick(&mut self) -> Option<(u64, String)> {
        if !self.on {
            return None;
        }
        self.seconds += 1;
        Some((self.seconds, self.formatted()))
    }

    /// `mm:ss`, widening to `hh:mm:ss` from one hour up.
    pub fn formatted(&self) -> String {
        let hours = self.seconds / 3600;
        let minutes = self.seconds % 3600 / 60;
        let seconds = self.seconds % 60;
        if hours > 0 {
            format!("{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes:02}:{seconds:02}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_count_while_running() {
        let mut timer = FlowTimer::default();
        assert_eq!(timer.tick(), None);
        timer.start();
        assert_eq!(timer.tick(), Some((1, "00:01".to_string())));
        timer.stop();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.seconds(), 1);
    }

    #[test]
    fn formatting_widens_past_one_hour() {
        let mut timer = FlowTimer::default();
        timer.start();
        for _ in 0..65 {
            timer.tick();
        }
        assert_eq!(timer.formatted(), "01:05");
        timer.seconds = 3661;
        assert_eq!(timer.formatted(), "01:01:01");
    }
}
