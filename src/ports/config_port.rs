//! Configuration access port trait.

use chrono::NaiveTime;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// `HH:MM` wall-clock value. `None` when missing, `Some(Err(raw))` when malformed.
    fn get_time(&self, section: &str, key: &str) -> Option<Result<NaiveTime, String>> {
        self.get_string(section, key).map(|raw| {
            NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| raw)
        })
    }
}
