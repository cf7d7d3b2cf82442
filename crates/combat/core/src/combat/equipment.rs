//! Equipment resolver.
//!
//! Flattens a combatant's equipped items (and consumable grants) into an
//! [`EffectMap`]: special-ability presence flags plus accumulated stat,
//! resistance and damage bonuses.

use bitflags::bitflags;
use strum::IntoEnumIterator;

use crate::config::EquipmentBonusStacking;
use crate::env::ItemOracle;
use crate::state::{
    Combatant, DamageBonuses, DefensiveEffect, Equipment, ItemDefinition, ItemSpecial,
    OffensiveEffect, Resistances, StatDeltas, WeaponAbility,
};

bitflags! {
    /// Presence flags for every item special.
    ///
    /// Weapon abilities occupy bits 0..17 in catalog order, offensive
    /// effects bits 17..21, defensive effects bits 21..25.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct SpecialFlags: u32 {
        const WEAPON      = 0x0001_FFFF;
        const OFFENSIVE   = 0xF << 17;
        const DEFENSIVE   = 0xF << 21;
        const REVIVE_ONCE = 1 << 25;
    }
}

impl SpecialFlags {
    const OFFENSIVE_SHIFT: u32 = 17;
    const DEFENSIVE_SHIFT: u32 = 21;

    pub fn of(special: ItemSpecial) -> Self {
        let bit = match special {
            ItemSpecial::Weapon(ability) => 1 << ability as u32,
            ItemSpecial::Offensive(effect) => 1 << (Self::OFFENSIVE_SHIFT + effect as u32),
            ItemSpecial::Defensive(effect) => 1 << (Self::DEFENSIVE_SHIFT + effect as u32),
            ItemSpecial::ReviveOnce => return Self::REVIVE_ONCE,
        };
        Self::from_bits_retain(bit)
    }

    pub fn has(&self, special: ItemSpecial) -> bool {
        self.contains(Self::of(special))
    }
}

/// Flattened equipment effects for one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectMap {
    pub specials: SpecialFlags,
    pub stats: StatDeltas,
    pub resistances: Resistances,
    pub damage_bonuses: DamageBonuses,
    pub dodge_bonus: f64,
    pub crit_bonus: f64,
    pub accuracy_bonus: f64,
}

impl EffectMap {
    pub fn has(&self, special: ItemSpecial) -> bool {
        self.specials.has(special)
    }

    /// Active weapon abilities in catalog order.
    pub fn weapon_abilities(&self) -> impl Iterator<Item = WeaponAbility> + '_ {
        WeaponAbility::iter().filter(|a| self.has(ItemSpecial::Weapon(*a)))
    }

    pub fn offensive_effects(&self) -> impl Iterator<Item = OffensiveEffect> + '_ {
        OffensiveEffect::iter().filter(|e| self.has(ItemSpecial::Offensive(*e)))
    }

    pub fn defensive_effects(&self) -> impl Iterator<Item = DefensiveEffect> + '_ {
        DefensiveEffect::iter().filter(|e| self.has(ItemSpecial::Defensive(*e)))
    }

    pub fn has_revive_once(&self) -> bool {
        self.specials.contains(SpecialFlags::REVIVE_ONCE)
    }

    fn accumulate(&mut self, item: &ItemDefinition, stacking: EquipmentBonusStacking) {
        if let Some(special) = item.special {
            self.specials |= SpecialFlags::of(special);
        }
        self.stats.accumulate(&item.stats);
        self.resistances.accumulate(&item.resistances);
        self.damage_bonuses.accumulate(&item.damage_bonuses);

        let combine = |current: &mut f64, bonus: Option<f64>| {
            if let Some(bonus) = bonus.filter(|b| b.is_finite()) {
                match stacking {
                    EquipmentBonusStacking::Overwrite => *current = bonus,
                    EquipmentBonusStacking::Sum => *current += bonus,
                }
            }
        };
        combine(&mut self.dodge_bonus, item.dodge_bonus);
        combine(&mut self.crit_bonus, item.crit_bonus);
        combine(&mut self.accuracy_bonus, item.accuracy_bonus);
    }
}

/// Resolve every equipped item into an effect map.
///
/// Items are visited in slot order. Unknown item ids are skipped.
pub fn resolve_effects(
    equipment: &Equipment,
    items: &(impl ItemOracle + ?Sized),
    stacking: EquipmentBonusStacking,
) -> EffectMap {
    let mut effects = EffectMap::default();
    for (slot, id) in equipment.iter() {
        match items.definition(id) {
            Some(item) => effects.accumulate(&item, stacking),
            None => tracing::trace!(%slot, item = %id, "unknown item skipped"),
        }
    }
    effects
}

/// Resolve a combatant's equipment plus its consumable grants.
///
/// Consumable grants only contribute special-ability flags.
pub fn resolve_combatant_effects(
    combatant: &Combatant,
    items: Option<&(impl ItemOracle + ?Sized)>,
    stacking: EquipmentBonusStacking,
) -> EffectMap {
    let mut effects = match items {
        Some(items) => resolve_effects(&combatant.equipment, items, stacking),
        None => EffectMap::default(),
    };
    for grant in combatant
        .consumable_effects
        .iter()
        .filter(|g| g.battles_remaining > 0)
    {
        effects.specials |= SpecialFlags::of(grant.special);
    }
    effects
}

/// Additive resistances across every equipped item.
pub fn resolve_resistances(
    equipment: &Equipment,
    items: &(impl ItemOracle + ?Sized),
) -> Resistances {
    let mut resistances = Resistances::default();
    for (_, id) in equipment.iter() {
        if let Some(item) = items.definition(id) {
            resistances.accumulate(&item.resistances);
        }
    }
    resistances
}
