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

//! Bounded lists of unique string values.

use std::collections::BTreeSet;

use crate::{
    engine::Error,
    generated::sdk::{beta, game_server::status::ListStatus},
};

/// The largest capacity a list may have.
pub const LIST_MAX_CAPACITY: i64 = 1000;

const CAPACITY_FIELD: &str = "capacity";
const VALUES_FIELD: &str = "values";

/// A pending change to one list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListUpdate {
    pub capacity: Option<i64>,
    pub remove: BTreeSet<String>,
    pub append: Vec<String>,
}

impl ListUpdate {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.remove.is_empty() && self.append.is_empty()
    }

    /// Validates appending `value` to the list as currently seen in `view`.
    pub fn add_value(&mut self, name: &str, view: &ListStatus, value: &str) -> Result<(), Error> {
        if view.values.len() as i64 >= view.capacity {
            return Err(Error::OutOfRange(format!(
                "out of range. No available capacity. Current Capacity: {}, List Size: {}",
                view.capacity,
                view.values.len()
            )));
        }

        if view.values.iter().any(|existing| existing == value) {
            return Err(Error::AlreadyExists(format!(
                "already exists. Value: {value} already in List: {name}"
            )));
        }

        self.push(value);
        Ok(())
    }

    /// Validates removing `value` from the list as currently seen in `view`.
    pub fn remove_value(
        &mut self,
        name: &str,
        view: &ListStatus,
        value: &str,
    ) -> Result<(), Error> {
        if !view.values.iter().any(|existing| existing == value) {
            return Err(Error::NotFound(format!(
                "not found. Value: {value} not found in List: {name}"
            )));
        }

        self.pull(value);
        Ok(())
    }

    pub fn set_capacity(&mut self, capacity: i64) -> Result<(), Error> {
        check_capacity(capacity)?;
        self.capacity = Some(capacity);
        Ok(())
    }

    /// Replaces the values seen in `view` with `values`.
    pub fn replace_values(&mut self, view: &ListStatus, values: &[String]) {
        for existing in &view.values {
            if !values.contains(existing) {
                self.pull(existing);
            }
        }

        for value in dedup(values) {
            if !view.values.contains(&value) {
                self.push(&value);
            }
        }
    }

    fn push(&mut self, value: &str) {
        if !self.remove.remove(value) && !self.append.iter().any(|v| v == value) {
            self.append.push(value.to_owned());
        }
    }

    fn pull(&mut self, value: &str) {
        match self.append.iter().position(|v| v == value) {
            Some(index) => {
                self.append.remove(index);
            }
            None => {
                self.remove.insert(value.to_owned());
            }
        }
    }

    /// Applies the change, truncating values beyond the capacity.
    pub fn apply(&self, base: &ListStatus) -> ListStatus {
        let capacity = self.capacity.unwrap_or(base.capacity);
        let mut values: Vec<String> = base
            .values
            .iter()
            .filter(|value| !self.remove.contains(*value))
            .cloned()
            .collect();

        for value in &self.append {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }

        let capacity = usize::try_from(capacity).unwrap_or_default();
        if values.len() > capacity {
            tracing::debug!(capacity, "truncating list values to capacity");
            values.truncate(capacity);
        }

        ListStatus {
            capacity: self.capacity.unwrap_or(base.capacity),
            values,
        }
    }

    /// Folds a later change into this one.
    pub fn merge(&mut self, later: &Self) {
        if later.capacity.is_some() {
            self.capacity = later.capacity;
        }

        for value in &later.remove {
            self.pull(value);
        }

        for value in &later.append {
            self.push(value);
        }
    }
}

fn check_capacity(capacity: i64) -> Result<(), Error> {
    if !(0..=LIST_MAX_CAPACITY).contains(&capacity) {
        return Err(Error::OutOfRange(format!(
            "out of range. Capacity must be within range [0,{LIST_MAX_CAPACITY}]. Found Capacity: {capacity}"
        )));
    }
    Ok(())
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .filter(|value| seen.insert(value.as_str()))
        .cloned()
        .collect()
}

/// Checks the `UpdateList` request, returning the list and the validated
/// field mask paths.
pub fn validate_update(
    list: Option<beta::List>,
    paths: Option<Vec<String>>,
) -> Result<(beta::List, Vec<String>), Error> {
    let (Some(list), Some(paths)) = (list, paths) else {
        return Err(Error::InvalidArgument(
            "invalid argument. List and UpdateMask cannot be nil".into(),
        ));
    };

    if paths.is_empty()
        || paths
            .iter()
            .any(|path| path != CAPACITY_FIELD && path != VALUES_FIELD)
    {
        return Err(Error::InvalidArgument(format!(
            "invalid argument. Field Mask Path(s): {paths:?} are invalid for List. Use valid field name(s): [{CAPACITY_FIELD} {VALUES_FIELD}]"
        )));
    }

    if paths.iter().any(|path| path == CAPACITY_FIELD) {
        check_capacity(list.capacity)?;
    }

    Ok((list, paths))
}

/// Builds the change described by a validated `UpdateList` request.
pub fn masked_update(
    view: &ListStatus,
    list: &beta::List,
    paths: &[String],
) -> Result<ListUpdate, Error> {
    let mut update = ListUpdate::default();

    if paths.iter().any(|path| path == CAPACITY_FIELD) {
        update.set_capacity(list.capacity)?;
    }

    if paths.iter().any(|path| path == VALUES_FIELD) {
        update.replace_values(view, &list.values);
    }

    Ok(update)
}

pub fn not_found(name: &str) -> Error {
    Error::NotFound(format!("not found. {name} List not found"))
}

pub fn to_proto(name: &str, list: &ListStatus) -> beta::List {
    beta::List {
        name: name.to_owned(),
        capacity: list.capacity,
        values: list.values.clone(),
    }
}
