//! Equipment slots and the item data the engine reads.
//!
//! Equipment stores item ids per slot. The item data itself (stat deltas,
//! resistances, special proc tag) is static content reached through the
//! [`ItemOracle`](crate::env::ItemOracle).

use std::collections::BTreeMap;
use std::fmt;

/// Equipment slots, in resolution order.
///
/// When two slots grant an overwriting bonus, the later slot in this order
/// wins.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
    Accessory,
    Charm,
}

/// Stable identifier of an item in the item catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Slot to item mapping for one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, ItemId>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> EquipmentBuilder {
        EquipmentBuilder::default()
    }

    /// Equips an item, returning the item previously in that slot.
    pub fn equip(&mut self, slot: EquipmentSlot, item: ItemId) -> Option<ItemId> {
        self.slots.insert(slot, item)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<ItemId> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&ItemId> {
        self.slots.get(&slot)
    }

    /// Equipped items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &ItemId)> {
        self.slots.iter().map(|(slot, id)| (*slot, id))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Builder for constructing equipment.
#[derive(Default)]
pub struct EquipmentBuilder {
    slots: BTreeMap<EquipmentSlot, ItemId>,
}

impl EquipmentBuilder {
    pub fn slot(mut self, slot: EquipmentSlot, item: impl Into<ItemId>) -> Self {
        self.slots.insert(slot, item.into());
        self
    }

    pub fn weapon(self, item: impl Into<ItemId>) -> Self {
        self.slot(EquipmentSlot::Weapon, item)
    }

    pub fn armor(self, item: impl Into<ItemId>) -> Self {
        self.slot(EquipmentSlot::Armor, item)
    }

    pub fn accessory(self, item: impl Into<ItemId>) -> Self {
        self.slot(EquipmentSlot::Accessory, item)
    }

    pub fn build(self) -> Equipment {
        Equipment { slots: self.slots }
    }
}

/// Flat stat changes granted by an item.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StatDeltas {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub luck: f64,
}

impl StatDeltas {
    pub fn accumulate(&mut self, other: &StatDeltas) {
        self.hp += other.hp;
        self.atk += other.atk;
        self.def += other.def;
        self.spd += other.spd;
        self.luck += other.luck;
    }
}

/// Elemental resistances in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Resistances {
    pub fire: f64,
    pub ice: f64,
    pub storm: f64,
    pub physical: f64,
}

impl Resistances {
    pub fn accumulate(&mut self, other: &Resistances) {
        self.fire += other.fire;
        self.ice += other.ice;
        self.storm += other.storm;
        self.physical += other.physical;
    }

    /// Sum of the three elemental channels.
    pub fn elemental_total(&self) -> f64 {
        self.fire + self.ice + self.storm
    }
}

/// Damage bonuses by damage channel, as fractions (0.1 = +10%).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DamageBonuses {
    pub fire: f64,
    pub ice: f64,
    pub storm: f64,
    pub physical: f64,
}

impl DamageBonuses {
    pub fn accumulate(&mut self, other: &DamageBonuses) {
        self.fire += other.fire;
        self.ice += other.ice;
        self.storm += other.storm;
        self.physical += other.physical;
    }

    pub fn total(&self) -> f64 {
        self.fire + self.ice + self.storm + self.physical
    }
}

/// Weapon abilities: on-attack procs with a fixed chance and bonus damage.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponAbility {
    FlameStrike,
    FrostBite,
    ThunderClap,
    VenomFang,
    Cleave,
    ArmorPierce,
    Bloodletter,
    Quake,
    ShadowStrike,
    HolySmite,
    ArcaneBurst,
    TidalWave,
    SoulReap,
    StormCall,
    AcidSplash,
    Rend,
    VoidRift,
}

/// Equipment effects rolled when the wearer attacks.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OffensiveEffect {
    /// Chance to slow the target.
    FrostAura,
    /// Chance to frighten the target.
    TerrorAura,
    /// Chance to silence the target.
    NullField,
    /// Chance to heal for part of the damage dealt.
    VampiricEdge,
}

/// Equipment effects rolled when the wearer is hit.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DefensiveEffect {
    /// Chance for flat damage reduction.
    ShieldBlock,
    /// Chance to burn the attacker.
    BurningCounter,
    /// Chance to reflect part of the damage.
    ThornMail,
    /// Chance to fortify after being hit.
    StoneSkin,
}

/// The single named special an item may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemSpecial {
    Weapon(WeaponAbility),
    Offensive(OffensiveEffect),
    Defensive(DefensiveEffect),
    /// Survive one lethal hit per battle at half HP.
    ReviveOnce,
}

impl fmt::Display for ItemSpecial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weapon(ability) => ability.fmt(f),
            Self::Offensive(effect) => effect.fmt(f),
            Self::Defensive(effect) => effect.fmt(f),
            Self::ReviveOnce => f.write_str("revive_once"),
        }
    }
}

/// Static item definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub stats: StatDeltas,
    pub resistances: Resistances,
    pub damage_bonuses: DamageBonuses,
    /// Fractional evasion bonus (0.1 = +10%).
    pub dodge_bonus: Option<f64>,
    /// Flat crit chance bonus.
    pub crit_bonus: Option<f64>,
    /// Fractional accuracy bonus.
    pub accuracy_bonus: Option<f64>,
    pub special: Option<ItemSpecial>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<ItemId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: StatDeltas) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn with_damage_bonuses(mut self, bonuses: DamageBonuses) -> Self {
        self.damage_bonuses = bonuses;
        self
    }

    pub fn with_dodge_bonus(mut self, bonus: f64) -> Self {
        self.dodge_bonus = Some(bonus);
        self
    }

    pub fn with_crit_bonus(mut self, bonus: f64) -> Self {
        self.crit_bonus = Some(bonus);
        self
    }

    pub fn with_accuracy_bonus(mut self, bonus: f64) -> Self {
        self.accuracy_bonus = Some(bonus);
        self
    }

    pub fn with_special(mut self, special: ItemSpecial) -> Self {
        self.special = Some(special);
        self
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
