use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;

pub type DateTime = chrono::DateTime<Utc>;

lazy_static! {
    // Zero value of a timestamp as the cluster encodes it (`0001-01-01T00:00:00Z`).
    static ref ZERO_TIME: DateTime = Utc
        .with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
}

pub fn now() -> DateTime {
    Utc::now()
}

pub fn zero_time() -> DateTime {
    *ZERO_TIME
}

pub trait DateTimeExt<Tz: TimeZone> {
    // Elapsed time from `earlier` to `self`, or `None` when `self` is not after it.
    fn duration_since(self, earlier: chrono::DateTime<Tz>) -> Option<std::time::Duration>;

    fn is_zero(&self) -> bool;
}

impl DateTimeExt<Utc> for DateTime {
    fn duration_since(self, earlier: chrono::DateTime<Utc>) -> Option<std::time::Duration> {
        let offset = self.signed_duration_since(earlier);
        if offset <= chrono::Duration::zero() {
            return None;
        }
        offset.to_std().ok()
    }

    fn is_zero(&self) -> bool {
        *self <= *ZERO_TIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_time() {
        assert!(zero_time().is_zero());
        assert!(!Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap().is_zero());
    }

    #[test]
    fn test_duration_since() {
        let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2022, 1, 1, 1, 0, 0).unwrap();
        assert_eq!(
            later.duration_since(start),
            Some(std::time::Duration::from_secs(3600))
        );
        assert_eq!(start.duration_since(later), None);
        assert_eq!(start.duration_since(start), None);
    }
}
