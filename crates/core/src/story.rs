//! Storyline chapters unlocked by player level.

const CHAPTERS: &[(u32, &str)] = &[
    (
        1,
        "You start your journey as a space trader, aiming to make a name for yourself in the cosmos.",
    ),
    (
        2,
        "After several successful trades, you hear rumors of a hidden treasure on a distant planet.",
    ),
    (
        3,
        "As you expand your trade routes, you encounter a group of pirates who challenge your dominance.",
    ),
    (
        4,
        "You discover an ancient technology that could revolutionize space travel, but it's protected by a powerful faction.",
    ),
    (
        5,
        "With your growing reputation, you are invited to join a prestigious space traders' guild.",
    ),
];

/// Read-only access to the chapter table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Storyline;

impl Storyline {
    /// Chapter unlocked exactly at `level`, if any.
    pub fn chapter(level: u32) -> Option<&'static str> {
        CHAPTERS
            .iter()
            .find(|(chapter, _)| *chapter == level)
            .map(|(_, text)| *text)
    }

    /// Every chapter up to and including `level`, in order.
    pub fn chapters_up_to(level: u32) -> Vec<&'static str> {
        CHAPTERS
            .iter()
            .take_while(|(chapter, _)| *chapter <= level)
            .map(|(_, text)| *text)
            .collect()
    }
}
