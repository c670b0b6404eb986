//! Export queue construction.

use std::collections::BTreeSet;

use crate::core::kind::DataKind;

/// Exportable kinds and the sub-kinds each of them makes available.
pub fn supported_data() -> Vec<(DataKind, Vec<DataKind>)> {
    vec![
        (DataKind::TrophyCategory, vec![]),
        (DataKind::UserFakeImport, vec![]),
        (DataKind::Trophy, vec![DataKind::UserTrophy]),
    ]
}

/// Order the selected kinds for export.
///
/// Categories go first so trophies can reference them. Legacy user IDs are
/// registered before trophies so that awards, which follow the trophies, can
/// resolve them. User trophies are only exported together with trophies.
pub fn build_queue(selected: &BTreeSet<DataKind>) -> Vec<DataKind> {
    let mut queue = Vec::with_capacity(DataKind::ALL.len());

    if selected.contains(&DataKind::TrophyCategory) {
        queue.push(DataKind::TrophyCategory);
    }

    if selected.contains(&DataKind::UserFakeImport) {
        queue.push(DataKind::UserFakeImport);
    }

    if selected.contains(&DataKind::Trophy) {
        queue.push(DataKind::Trophy);
        if selected.contains(&DataKind::UserTrophy) {
            queue.push(DataKind::UserTrophy);
        }
    }

    queue
}
