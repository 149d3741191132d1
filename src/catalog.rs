/// Item identifiers the recommender backends were trained on, in display order.
pub const VALID_ITEM_IDS: [&str; 10] = [
    "-9222795471790223670",
    "-9216926795620865886",
    "-9194572880052200111",
    "-9192549002213406534",
    "-9190737901804729417",
    "-9189659052158407108",
    "-9184137057748005562",
    "-9176143510534135851",
    "-9172673334835262304",
    "-9171475473795142532",
];

/// Label of the leading "no selection" option in the picker.
pub const PLACEHOLDER_OPTION: &str = "-- Choose an item --";

/// Number of rows in the picker, placeholder included.
pub const OPTION_COUNT: usize = VALID_ITEM_IDS.len() + 1;

pub fn is_valid(item_id: &str) -> bool {
    VALID_ITEM_IDS.contains(&item_id)
}

/// Value committed when picker row `index` is chosen.
///
/// Row 0 is the placeholder and maps to the empty string; rows past the end
/// yield `None`.
pub fn option_value(index: usize) -> Option<&'static str> {
    match index {
        0 => Some(""),
        i => VALID_ITEM_IDS.get(i - 1).copied(),
    }
}

/// Picker row holding `item_id`, or 0 when it is not in the catalog.
pub fn option_index(item_id: &str) -> usize {
    VALID_ITEM_IDS
        .iter()
        .position(|id| *id == item_id)
        .map_or(0, |i| i + 1)
}
