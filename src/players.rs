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

//! The in-memory register of connected players.

use crate::{engine::Error, generated::sdk::game_server::status::PlayerStatus};

/// An insertion ordered set of player ids with a capacity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerRegister {
    capacity: i64,
    ids: Vec<String>,
}

impl PlayerRegister {
    pub fn new(capacity: i64, ids: impl IntoIterator<Item = String>) -> Self {
        let mut register = Self {
            capacity,
            ids: Vec::new(),
        };

        for id in ids {
            if !register.ids.contains(&id) {
                register.ids.push(id);
            }
        }

        register
    }

    /// Adds `id`, returning `false` when it was already connected.
    pub fn connect(&mut self, id: &str) -> Result<bool, Error> {
        if self.is_connected(id) {
            return Ok(false);
        }

        if self.count() >= self.capacity {
            return Err(Error::PlayersAtCapacity);
        }

        self.ids.push(id.to_owned());
        Ok(true)
    }

    /// Removes `id`, returning `false` when it was not connected.
    pub fn disconnect(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|existing| existing == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Changes the capacity. Players already connected beyond the new
    /// capacity stay connected.
    pub fn set_capacity(&mut self, capacity: i64) -> Result<(), Error> {
        if capacity < 0 {
            return Err(Error::InvalidArgument(format!(
                "invalid argument. Player capacity must be greater than or equal to 0. Found Capacity: {capacity}"
            )));
        }

        self.capacity = capacity;
        Ok(())
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn count(&self) -> i64 {
        self.ids.len() as i64
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn to_status(&self) -> PlayerStatus {
        PlayerStatus {
            count: self.count(),
            capacity: self.capacity,
            ids: self.ids.clone(),
        }
    }
}

impl From<&PlayerStatus> for PlayerRegister {
    fn from(status: &PlayerStatus) -> Self {
        Self::new(status.capacity, status.ids.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn capacity_enforced() {
        let mut register = PlayerRegister::new(1, []);
        assert_eq!(register.connect("a"), Ok(true));
        assert_eq!(register.connect("b"), Err(Error::PlayersAtCapacity));
        assert_eq!(register.count(), 1);
        assert_eq!(register.ids(), ["a".to_owned()]);
        assert!(register.disconnect("a"));
        assert!(!register.disconnect("a"));
    }

    #[test]
    fn connect_is_idempotent() {
        let mut register = PlayerRegister::new(10, []);
        assert_eq!(register.connect("a"), Ok(true));
        assert_eq!(register.connect("a"), Ok(false));
        assert!(register.is_connected("a"));
        assert!(!register.is_connected("A"));
        assert!(register.disconnect("a"));
        assert!(!register.is_connected("a"));
    }

    #[test]
    fn insertion_order() {
        let mut register = PlayerRegister::new(10, []);
        for id in ["c", "a", "b"] {
            register.connect(id).unwrap();
        }
        register.disconnect("a");
        register.connect("a").unwrap();
        assert_eq!(register.ids(), ["c", "b", "a"].map(String::from));
    }

    #[test]
    fn shrinking_capacity_keeps_players() {
        let mut register = PlayerRegister::new(3, ["a", "b", "c"].map(String::from));
        register.set_capacity(1).unwrap();
        assert_eq!(register.count(), 3);
        assert_eq!(register.connect("d"), Err(Error::PlayersAtCapacity));
        assert!(register.set_capacity(-1).is_err());
    }

    #[test]
    fn from_status_drops_duplicates() {
        let register = PlayerRegister::from(&PlayerStatus {
            count: 3,
            capacity: 5,
            ids: ["a", "a", "b"].map(String::from).to_vec(),
        });
        assert_eq!(
            register.to_status(),
            PlayerStatus {
                count: 2,
                capacity: 5,
                ids: ["a", "b"].map(String::from).to_vec(),
            }
        );
    }
}
