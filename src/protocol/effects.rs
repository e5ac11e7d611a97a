//! Named preset effects.
//!
//! The controller knows presets only by number (1–58). A handful of them
//! have well-known names; this table maps between the two. Order is the
//! order effects are presented to users.

/// Lowest and highest preset ids the controller accepts.
pub const PRESET_MIN: u8 = 1;
pub const PRESET_MAX: u8 = 58;

/// A named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub name: &'static str,
    pub preset: u8,
}

const fn effect(name: &'static str, preset: u8) -> Effect {
    Effect { name, preset }
}

const EFFECTS: [Effect; 14] = [
    effect("Blue White Dissolve", 41),
    effect("Blue Sparkle", 56),
    effect("White Sparkle", 57),
    effect("Blue with Pink Sparkle", 8),
    effect("Fireworks", 17),
    effect("Xmas", 18),
    effect("Candy Cane", 50),
    effect("Halloween", 20),
    effect("Red Gold", 40),
    effect("July 4th", 39),
    effect("Valentine", 46),
    effect("St. Patrick", 47),
    effect("May Day", 48),
    effect("Snow Day", 54),
];

/// Immutable, ordered name ↔ preset table.
#[derive(Debug, Clone, Copy)]
pub struct EffectCatalog {
    entries: &'static [Effect],
}

impl Default for EffectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectCatalog {
    pub const fn new() -> Self {
        Self { entries: &EFFECTS }
    }

    /// Preset id for an effect name (exact, case-sensitive match).
    pub fn lookup(&self, name: &str) -> Option<u8> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.preset)
    }

    /// Effect name for a preset id, if the preset has one.
    pub fn name_for(&self, preset: u8) -> Option<&'static str> {
        self.entries.iter().find(|e| e.preset == preset).map(|e| e.name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn entries(&self) -> &'static [Effect] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
