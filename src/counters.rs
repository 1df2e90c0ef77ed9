/*
 * Copyright 2024 Google LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Bounded integer counters.
//!
//! A [`CounterUpdate`] is a pending change to one counter. The local engine
//! applies each update as soon as it is validated, the cluster engine folds
//! updates into a batch that the reconciler later writes.

use crate::{
    engine::Error,
    generated::sdk::{beta, game_server::status::CounterStatus},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterUpdate {
    pub count: Option<i64>,
    pub capacity: Option<i64>,
    pub diff: i64,
}

impl CounterUpdate {
    /// Reads the wire request, which must change at least one thing.
    pub fn from_request(request: &beta::CounterUpdateRequest) -> Result<Self, Error> {
        let update = Self {
            count: request.count,
            capacity: request.capacity,
            diff: request.count_diff,
        };

        if update.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "invalid argument. Malformed CounterUpdateRequest: {request:?}"
            )));
        }

        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.capacity.is_none() && self.diff == 0
    }

    /// Validates `self` against `base` with the already `pending` changes
    /// applied, returning the combined pending change.
    pub fn stage(&self, base: &CounterStatus, pending: &Self) -> Result<Self, Error> {
        let mut staged = pending.clone();

        if let Some(capacity) = self.capacity {
            if capacity < 0 {
                return Err(Error::OutOfRange(format!(
                    "out of range. Capacity must be greater than or equal to 0. Found Capacity: {capacity}"
                )));
            }
            staged.capacity = Some(capacity);
        }

        let capacity = staged.capacity.unwrap_or(base.capacity);

        if let Some(count) = self.count {
            if count < 0 || count > capacity {
                return Err(out_of_range(count, capacity));
            }
            staged.count = Some(count);
            staged.diff = 0;
        }

        if self.diff != 0 {
            let diff = staged
                .diff
                .checked_add(self.diff)
                .ok_or_else(|| overflow(self.diff))?;
            let count = staged
                .count
                .unwrap_or(base.count)
                .checked_add(diff)
                .ok_or_else(|| overflow(self.diff))?;
            if count < 0 || count > capacity {
                return Err(out_of_range(count, capacity));
            }
            staged.diff = diff;
        }

        Ok(staged)
    }

    /// Applies the change, clamping the count to `[0, capacity]`.
    pub fn apply(&self, base: &CounterStatus) -> CounterStatus {
        let capacity = self.capacity.unwrap_or(base.capacity);
        let count = self.count.unwrap_or(base.count).saturating_add(self.diff);

        if count < 0 {
            tracing::debug!(count, "truncating counter count to 0");
        } else if count > capacity {
            tracing::debug!(count, capacity, "truncating counter count to capacity");
        }

        CounterStatus {
            count: count.clamp(0, capacity.max(0)),
            capacity,
        }
    }

    /// Folds a later change into this one.
    pub fn merge(&mut self, later: &Self) {
        if later.capacity.is_some() {
            self.capacity = later.capacity;
        }

        if later.count.is_some() {
            self.count = later.count;
            self.diff = later.diff;
        } else {
            self.diff = self.diff.saturating_add(later.diff);
        }
    }
}

fn overflow(diff: i64) -> Error {
    Error::OutOfRange(format!(
        "out of range. Count must be within range [0,Capacity]. Found CountDiff: {diff}"
    ))
}

fn out_of_range(count: i64, capacity: i64) -> Error {
    Error::OutOfRange(format!(
        "out of range. Count must be within range [0,Capacity]. Found Count: {count}, Capacity: {capacity}"
    ))
}

pub fn not_found(name: &str) -> Error {
    Error::NotFound(format!("not found. {name} Counter not found"))
}

pub fn to_proto(name: &str, counter: &CounterStatus) -> beta::Counter {
    beta::Counter {
        name: name.to_owned(),
        count: counter.count,
        capacity: counter.capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counter(count: i64, capacity: i64) -> CounterStatus {
        CounterStatus { count, capacity }
    }

    impl CounterUpdate {
        fn increment(amount: i64) -> Result<Self, Error> {
            Self::non_negative(amount, "increment")?;
            Ok(Self {
                diff: amount,
                ..Self::default()
            })
        }

        fn decrement(amount: i64) -> Result<Self, Error> {
            Self::non_negative(amount, "decrement")?;
            Ok(Self {
                diff: -amount,
                ..Self::default()
            })
        }

        fn set_count(count: i64) -> Self {
            Self {
                count: Some(count),
                ..Self::default()
            }
        }

        fn set_capacity(capacity: i64) -> Self {
            Self {
                capacity: Some(capacity),
                ..Self::default()
            }
        }

        fn non_negative(amount: i64, op: &str) -> Result<(), Error> {
            if amount < 0 {
                return Err(Error::InvalidArgument(format!(
                    "invalid argument. Amount to {op} must be greater than or equal to 0. Found: {amount}"
                )));
            }
            Ok(())
        }
    }

    fn commit(base: &CounterStatus, update: CounterUpdate) -> Result<CounterStatus, Error> {
        update
            .stage(base, &CounterUpdate::default())
            .map(|staged| staged.apply(base))
    }

    #[test]
    fn increment_and_decrement() {
        let base = counter(1, 10);
        assert_eq!(
            commit(&base, CounterUpdate::increment(9).unwrap()),
            Ok(counter(10, 10))
        );
        assert!(matches!(
            commit(&base, CounterUpdate::increment(10).unwrap()),
            Err(Error::OutOfRange(_))
        ));
        assert_eq!(
            commit(&base, CounterUpdate::decrement(1).unwrap()),
            Ok(counter(0, 10))
        );
        assert_eq!(
            commit(&base, CounterUpdate::decrement(2).unwrap()),
            Err(out_of_range(-1, 10))
        );
        assert!(CounterUpdate::increment(-1).is_err());
    }

    #[test]
    fn set_count_bounds() {
        let base = counter(1, 10);
        assert_eq!(commit(&base, CounterUpdate::set_count(10)), Ok(counter(10, 10)));
        assert_eq!(
            commit(&base, CounterUpdate::set_count(11)),
            Err(Error::OutOfRange(
                "out of range. Count must be within range [0,Capacity]. Found Count: 11, Capacity: 10"
                    .into()
            ))
        );
        assert!(commit(&base, CounterUpdate::set_count(-1)).is_err());
    }

    #[test]
    fn set_capacity() {
        let base = counter(5, 10);
        assert_eq!(commit(&base, CounterUpdate::set_capacity(20)), Ok(counter(5, 20)));
        assert_eq!(
            commit(&base, CounterUpdate::set_capacity(-1)),
            Err(Error::OutOfRange(
                "out of range. Capacity must be greater than or equal to 0. Found Capacity: -1"
                    .into()
            ))
        );
        // shrinking below the count clamps the count
        assert_eq!(commit(&base, CounterUpdate::set_capacity(2)), Ok(counter(2, 2)));
    }

    #[test]
    fn staged_batches_validate_against_pending() {
        let base = counter(0, 3);
        let pending = CounterUpdate::increment(2)
            .unwrap()
            .stage(&base, &CounterUpdate::default())
            .unwrap();
        let pending = CounterUpdate::increment(1)
            .unwrap()
            .stage(&base, &pending)
            .unwrap();
        assert_eq!(pending.diff, 3);
        assert!(CounterUpdate::increment(1)
            .unwrap()
            .stage(&base, &pending)
            .is_err());

        let pending = CounterUpdate::set_count(1).stage(&base, &pending).unwrap();
        assert_eq!(pending.count, Some(1));
        assert_eq!(pending.diff, 0);
        assert_eq!(pending.apply(&base), counter(1, 3));
    }

    #[test]
    fn merge_folds_in_order() {
        let mut earlier = CounterUpdate {
            count: None,
            capacity: None,
            diff: 2,
        };
        earlier.merge(&CounterUpdate::increment(1).unwrap());
        assert_eq!(earlier.diff, 3);

        earlier.merge(&CounterUpdate::set_count(5));
        assert_eq!(earlier.count, Some(5));
        assert_eq!(earlier.diff, 0);

        earlier.merge(&CounterUpdate::set_capacity(7));
        assert_eq!(earlier.apply(&counter(0, 10)), counter(5, 7));
    }

    #[test]
    fn overflowing_diff_is_out_of_range() {
        let base = counter(1, 10);
        let update = CounterUpdate {
            diff: i64::MAX,
            ..CounterUpdate::default()
        };
        assert!(matches!(commit(&base, update), Err(Error::OutOfRange(_))));

        let pending = CounterUpdate {
            diff: i64::MIN + 1,
            ..CounterUpdate::default()
        };
        let update = CounterUpdate {
            diff: -2,
            ..CounterUpdate::default()
        };
        assert!(matches!(
            update.stage(&base, &pending),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn empty_request_rejected() {
        let request = beta::CounterUpdateRequest {
            name: "rooms".into(),
            ..Default::default()
        };
        assert!(matches!(
            CounterUpdate::from_request(&request),
            Err(Error::InvalidArgument(_))
        ));

        let request = beta::CounterUpdateRequest {
            name: "rooms".into(),
            count_diff: -2,
            ..Default::default()
        };
        assert_eq!(
            CounterUpdate::from_request(&request).unwrap(),
            CounterUpdate::decrement(2).unwrap()
        );
    }
}
