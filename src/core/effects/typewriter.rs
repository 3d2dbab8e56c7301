use super::TimeoutRegistry;
use crate::config::DeviceProfile;
use crate::core::error::TimerError;
use crate::core::terminal::Terminal;
use crate::utils::ansi::{self, Segment};

/// Type `lines` out one visible character at a time.
///
/// Escape sequences are written whole without a pause. Each line ends with
/// a newline and a longer pause. Stops at the next pause after the registry
/// is cleared.
pub async fn typewriter(
    term: &dyn Terminal,
    lines: &[String],
    timers: &TimeoutRegistry,
    device: DeviceProfile,
) -> Result<(), TimerError> {
    for line in lines {
        for segment in ansi::segments(line) {
            match segment {
                Segment::Escape(seq) => term.write(seq),
                Segment::Char(c) => {
                    term.write(c);
                    timers.delay(device.char_delay()).await?;
                }
            }
        }
        term.writeln("");
        timers.delay(device.line_delay()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::effects::InstantSleeper;
    use crate::core::effects::testing::CancelOnSleep;
    use crate::core::terminal::Transcript;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_types_every_line() {
        let term = Transcript::new();
        let sleeper = Rc::new(InstantSleeper::new());
        let timers = TimeoutRegistry::new(sleeper.clone());

        typewriter(&term, &lines(&["ab", "", "\x1b[92mc\x1b[0m"]), &timers, DeviceProfile::DESKTOP)
            .await
            .unwrap();

        assert_eq!(term.output(), "ab\r\n\r\n\x1b[92mc\x1b[0m\r\n");
        // 3 characters and 3 lines
        assert_eq!(sleeper.calls(), 6);
        assert_eq!(sleeper.slept_ms(), 3 * 10 + 3 * 30);
        assert_eq!(timers.pending(), 0);
    }

    #[tokio::test]
    async fn test_mobile_pacing() {
        let term = Transcript::new();
        let sleeper = Rc::new(InstantSleeper::new());
        let timers = TimeoutRegistry::new(sleeper.clone());

        typewriter(&term, &lines(&["xy"]), &timers, DeviceProfile::MOBILE)
            .await
            .unwrap();
        assert_eq!(sleeper.slept_ms(), 2 * 5 + 20);
    }

    #[tokio::test]
    async fn test_stops_when_cleared() {
        let term = Transcript::new();
        let sleeper = CancelOnSleep::on_call(2);
        let timers = TimeoutRegistry::new(sleeper.clone());
        sleeper.arm(&timers);

        let result = typewriter(&term, &lines(&["hello", "world"]), &timers, DeviceProfile::DESKTOP).await;

        assert_eq!(result, Err(TimerError::Cancelled));
        assert_eq!(term.output(), "he");
    }
}
