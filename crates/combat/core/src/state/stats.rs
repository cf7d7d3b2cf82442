//! Stat blocks and the stat resolver.
//!
//! Stat blocks arrive from pet and monster records that may be incomplete or
//! malformed. [`RawStats`] accepts anything; [`normalize`] turns it into a
//! [`Stats`] block that satisfies the engine's floors. Normalization never
//! fails.

/// Unvalidated stat block as stored by collaborators.
///
/// Missing fields take the resolver's defaults; non-finite or negative values
/// are clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawStats {
    pub hp: Option<f64>,
    pub atk: Option<f64>,
    pub def: Option<f64>,
    pub spd: Option<f64>,
    pub luck: Option<f64>,
    pub accuracy: Option<f64>,
    pub evasion: Option<f64>,
}

/// Normalized stat block.
///
/// Invariant: `hp >= 1`, `atk >= 1`, `def >= 0`, `spd >= 1`, `luck >= 0`,
/// `accuracy >= 0.1`, `evasion >= 0.1`, every value finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: u32,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub luck: f64,
    pub accuracy: f64,
    pub evasion: f64,
}

/// Individual stat selector used by status effects and skill transforms.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Hp,
    Atk,
    Def,
    Spd,
    Luck,
    Accuracy,
    Evasion,
}

/// Floors and defaults applied by the resolver.
pub mod floors {
    pub const HP: f64 = 1.0;
    pub const ATK: f64 = 1.0;
    pub const DEF: f64 = 0.0;
    pub const SPD: f64 = 1.0;
    pub const LUCK: f64 = 0.0;
    pub const ACCURACY: f64 = 0.1;
    pub const EVASION: f64 = 0.1;

    pub const DEFAULT_HP: f64 = 100.0;
    pub const DEFAULT_ATK: f64 = 10.0;
    pub const DEFAULT_DEF: f64 = 5.0;
    pub const DEFAULT_SPD: f64 = 10.0;
    pub const DEFAULT_LUCK: f64 = 0.0;
    pub const DEFAULT_ACCURACY: f64 = 1.0;
    pub const DEFAULT_EVASION: f64 = 1.0;
}

fn sanitize(value: Option<f64>, default: f64, floor: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.max(floor),
        Some(v) if v == f64::INFINITY => f64::from(u32::MAX).max(floor),
        Some(_) => floor,
        None => default.max(floor),
    }
}

/// Normalize an unvalidated stat block.
///
/// Never fails: missing values take defaults, everything else is clamped to
/// its floor.
pub fn normalize(raw: &RawStats) -> Stats {
    let hp = sanitize(raw.hp, floors::DEFAULT_HP, floors::HP);
    Stats {
        hp: hp.min(f64::from(u32::MAX)).floor() as u32,
        atk: sanitize(raw.atk, floors::DEFAULT_ATK, floors::ATK),
        def: sanitize(raw.def, floors::DEFAULT_DEF, floors::DEF),
        spd: sanitize(raw.spd, floors::DEFAULT_SPD, floors::SPD),
        luck: sanitize(raw.luck, floors::DEFAULT_LUCK, floors::LUCK),
        accuracy: sanitize(raw.accuracy, floors::DEFAULT_ACCURACY, floors::ACCURACY),
        evasion: sanitize(raw.evasion, floors::DEFAULT_EVASION, floors::EVASION),
    }
}

impl Stats {
    /// Creates a stat block from concrete values, normalizing on the way in.
    pub fn new(hp: u32, atk: f64, def: f64, spd: f64) -> Self {
        normalize(&RawStats {
            hp: Some(f64::from(hp)),
            atk: Some(atk),
            def: Some(def),
            spd: Some(spd),
            ..RawStats::default()
        })
    }

    pub fn with_luck(mut self, luck: f64) -> Self {
        self.luck = luck;
        self.normalized()
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self.normalized()
    }

    pub fn with_evasion(mut self, evasion: f64) -> Self {
        self.evasion = evasion;
        self.normalized()
    }

    /// Re-applies the resolver floors to an already-typed block.
    pub fn normalized(&self) -> Self {
        normalize(&self.to_raw())
    }

    pub fn to_raw(&self) -> RawStats {
        RawStats {
            hp: Some(f64::from(self.hp)),
            atk: Some(self.atk),
            def: Some(self.def),
            spd: Some(self.spd),
            luck: Some(self.luck),
            accuracy: Some(self.accuracy),
            evasion: Some(self.evasion),
        }
    }

    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Hp => f64::from(self.hp),
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Spd => self.spd,
            StatKind::Luck => self.luck,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
        }
    }

    /// Multiplies one stat in place. The result is re-floored.
    pub fn scale(&mut self, stat: StatKind, factor: f64) {
        let factor = if factor.is_finite() { factor } else { 1.0 };
        match stat {
            StatKind::Hp => {
                self.hp = (f64::from(self.hp) * factor)
                    .clamp(floors::HP, f64::from(u32::MAX))
                    .floor() as u32
            }
            StatKind::Atk => self.atk = (self.atk * factor).max(floors::ATK),
            StatKind::Def => self.def = (self.def * factor).max(floors::DEF),
            StatKind::Spd => self.spd = (self.spd * factor).max(floors::SPD),
            StatKind::Luck => self.luck = (self.luck * factor).max(floors::LUCK),
            StatKind::Accuracy => self.accuracy = (self.accuracy * factor).max(floors::ACCURACY),
            StatKind::Evasion => self.evasion = (self.evasion * factor).max(floors::EVASION),
        }
    }

    /// Adds a flat amount to one stat. The result is re-floored.
    pub fn add(&mut self, stat: StatKind, amount: f64) {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        match stat {
            StatKind::Hp => {
                self.hp = (f64::from(self.hp) + amount)
                    .clamp(floors::HP, f64::from(u32::MAX))
                    .floor() as u32
            }
            StatKind::Atk => self.atk = (self.atk + amount).max(floors::ATK),
            StatKind::Def => self.def = (self.def + amount).max(floors::DEF),
            StatKind::Spd => self.spd = (self.spd + amount).max(floors::SPD),
            StatKind::Luck => self.luck = (self.luck + amount).max(floors::LUCK),
            StatKind::Accuracy => self.accuracy = (self.accuracy + amount).max(floors::ACCURACY),
            StatKind::Evasion => self.evasion = (self.evasion + amount).max(floors::EVASION),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        normalize(&RawStats::default())
    }
}

impl From<RawStats> for Stats {
    fn from(raw: RawStats) -> Self {
        normalize(&raw)
    }
}
