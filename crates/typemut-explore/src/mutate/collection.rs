use rand::Rng;
use typemut_ir::types::{Mapping, Value};

use super::Mutator;

/// Structural edits shared by sequences, tuples and sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEdit {
    Remove,
    AppendMutated,
    AppendDuplicate,
    ReplaceInPlace,
}

impl ListEdit {
    const ALL: [ListEdit; 4] = [
        ListEdit::Remove,
        ListEdit::AppendMutated,
        ListEdit::AppendDuplicate,
        ListEdit::ReplaceInPlace,
    ];
}

/// Structural edits for mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingEdit {
    RemoveKey,
    AddEntry,
    ReplaceValue,
}

impl MappingEdit {
    const ALL: [MappingEdit; 3] = [
        MappingEdit::RemoveKey,
        MappingEdit::AddEntry,
        MappingEdit::ReplaceValue,
    ];
}

impl Mutator<'_> {
    /// Sequence rule. Empty input is returned unchanged.
    pub(crate) fn mutate_list_like<R: Rng + ?Sized>(&self, items: Vec<Value>, rng: &mut R) -> Vec<Value> {
        if items.is_empty() {
            return items;
        }
        let edit = ListEdit::ALL[rng.gen_range(0..ListEdit::ALL.len())];
        self.apply_list_edit(edit, items, rng)
    }

    pub(crate) fn apply_list_edit<R: Rng + ?Sized>(
        &self,
        edit: ListEdit,
        mut items: Vec<Value>,
        rng: &mut R,
    ) -> Vec<Value> {
        if items.is_empty() {
            return items;
        }
        let idx = rng.gen_range(0..items.len());
        match edit {
            ListEdit::Remove => {
                items.remove(idx);
            }
            ListEdit::AppendMutated => {
                let mutated = self.mutate_once(items[idx].clone(), rng);
                items.push(mutated);
            }
            ListEdit::AppendDuplicate => {
                let duplicate = items[idx].clone();
                items.push(duplicate);
            }
            ListEdit::ReplaceInPlace => {
                let element = std::mem::replace(&mut items[idx], Value::Boolean(false));
                items[idx] = self.mutate_once(element, rng);
            }
        }
        items
    }

    /// Mapping rule. Empty input is returned unchanged.
    pub(crate) fn mutate_mapping<R: Rng + ?Sized>(&self, map: Mapping, rng: &mut R) -> Mapping {
        if map.is_empty() {
            return map;
        }
        let edit = MappingEdit::ALL[rng.gen_range(0..MappingEdit::ALL.len())];
        self.apply_mapping_edit(edit, map, rng)
    }

    pub(crate) fn apply_mapping_edit<R: Rng + ?Sized>(
        &self,
        edit: MappingEdit,
        mut map: Mapping,
        rng: &mut R,
    ) -> Mapping {
        if map.is_empty() {
            return map;
        }
        match edit {
            MappingEdit::RemoveKey => {
                let idx = rng.gen_range(0..map.len());
                if let Some((key, _)) = map.entry_at(idx) {
                    let key = key.clone();
                    map.remove(&key);
                }
            }
            MappingEdit::AddEntry => {
                let key_idx = rng.gen_range(0..map.len());
                let value_idx = rng.gen_range(0..map.len());
                let (key, value) = match (map.entry_at(key_idx), map.entry_at(value_idx)) {
                    (Some((k, _)), Some((_, v))) => (k.clone(), v.clone()),
                    _ => return map,
                };
                let key = self.mutate_once(key, rng);
                let value = self.mutate_once(value, rng);
                // A colliding key overwrites the existing entry.
                map.insert(key, value);
            }
            MappingEdit::ReplaceValue => {
                let idx = rng.gen_range(0..map.len());
                if let Some(slot) = map.value_at_mut(idx) {
                    let value = std::mem::replace(slot, Value::Boolean(false));
                    *slot = self.mutate_once(value, rng);
                }
            }
        }
        map
    }
}
