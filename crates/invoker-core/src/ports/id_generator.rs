//! VersionIdGenerator port - object version id の生成
//!
//! in-memory bucket は copy のたびに新しい version id を振ります。
//!
//! # 実装
//! - **UlidVersionGenerator**: ULID ベース（時刻でソート可能）

use crate::ports::Clock;
use ulid::Ulid;

/// VersionIdGenerator は object の version id を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（bucket registry から共有される）
pub trait VersionIdGenerator: Send + Sync {
    fn next_version_id(&self) -> String;
}

/// UlidVersionGenerator は ULID ベースの version id 生成器
///
/// Clock を使って timestamp 部分を決めるので、
/// FixedClock を渡すと timestamp 部分が固定されます。
pub struct UlidVersionGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidVersionGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> VersionIdGenerator for UlidVersionGenerator<C> {
    fn next_version_id(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidVersionGenerator::new(SystemClock);

        let id1 = id_gen.next_version_id();
        let id2 = id_gen.next_version_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 26);
    }

    #[test]
    fn fixed_clock_pins_the_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidVersionGenerator::new(FixedClock::new(fixed_time));

        let id1: Ulid = id_gen.next_version_id().parse().unwrap();
        let id2: Ulid = id_gen.next_version_id().parse().unwrap();

        // ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);

        // timestamp 部分は同じ
        assert_eq!(id1.timestamp_ms(), id2.timestamp_ms());
        assert_eq!(id1.timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }
}
