use tracing::warn;

use lantern_core::{Arg, Attributed, Command, ContainerRef, CoreError, ItemFlags, ItemKey};

use super::item_arg;
use crate::chain::{StageResult, Turn};

fn unresolved(turn: &Turn<'_>) -> StageResult {
    turn.reject("nothing_happens", vec![])
}

fn broken(turn: &Turn<'_>, err: CoreError) -> StageResult {
    warn!(error = %err, "world refused a move the handler allowed");
    turn.reject("nothing_happens", vec![])
}

/// Pick up an item.
pub fn take(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let world = &*turn.world;
    let name = world.item_name(key);
    if world.player_holds(key) {
        return turn.reject("reject_carrying", vec![name]);
    }
    if let Some(owner) = world.item_owner(key) {
        return turn.reject("reject_owned", vec![name, world.item_name(owner)]);
    }
    let Some(item) = world.item(key) else {
        return unresolved(turn);
    };
    if item.is_liquid() {
        return turn.reject("reject_liquid", vec![name]);
    }
    if !item.has_attribute(ItemFlags::PORTABLE) {
        return turn.reject("reject_not_portable", vec![name]);
    }
    let inventory = world
        .current_inventory()
        .filter(|inv| world.inventory_can_accommodate(*inv, key));
    let Some(inventory) = inventory else {
        return turn.reject("reject_too_heavy", vec![name]);
    };

    match turn.world.insert(ContainerRef::Inventory(inventory), key) {
        Ok(()) => turn.ok("confirm_taken", vec![name], args),
        Err(err) => broken(turn, err),
    }
}

/// Put down a held item. Liquids drain away instead.
pub fn drop(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let name = turn.world.item_name(key);
    if !turn.world.player_holds(key) {
        return turn.reject("reject_not_holding", vec![name]);
    }
    if let Some(wear) = turn.world.item_mut(key).and_then(|i| i.wear_facet.as_mut()) {
        wear.worn = false;
    }

    let liquid = turn.world.item(key).is_some_and(|i| i.is_liquid());
    if liquid {
        return match turn.world.destroy(key) {
            Ok(()) => turn.ok("confirm_poured", vec![name], args),
            Err(err) => broken(turn, err),
        };
    }
    let here = ContainerRef::Location(turn.world.player.location);
    match turn.world.insert(here, key) {
        Ok(()) => turn.ok("confirm_dropped", vec![name], args),
        Err(err) => broken(turn, err),
    }
}

/// Put the first item into the second. Copyable items (water from a lake)
/// leave the original where it is and insert a copy.
pub fn insert(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let (Some(key), Some(container)) = (item_arg(&args, 0), item_arg(&args, 1)) else {
        return unresolved(turn);
    };
    let world = &*turn.world;
    let name = world.item_name(key);
    let container_name = world.item_name(container);
    let (Some(item), Some(target)) = (world.item(key), world.item(container)) else {
        return unresolved(turn);
    };

    let Some(facet) = &target.container_facet else {
        return turn.reject("reject_not_container", vec![container_name]);
    };
    if key == container {
        return turn.reject("reject_insert_self", vec![name]);
    }
    if let Some(occupant) = facet.contents {
        return turn.reject("reject_container_full", vec![container_name, world.item_name(occupant)]);
    }
    if !world.accepts_kind(container, key) {
        return turn.reject("reject_wrong_contents", vec![container_name, name]);
    }
    if target.size <= item.size {
        return turn.reject("reject_too_big", vec![name, container_name]);
    }
    let gains_weight = world.player_holds(container) && !world.player_holds(key);
    if gains_weight {
        let fits = world
            .current_inventory()
            .is_some_and(|inv| world.inventory_can_accommodate(inv, key));
        if !fits {
            return turn.reject("reject_too_heavy", vec![name]);
        }
    }

    let into = ContainerRef::Item(container);
    let result = if item.has_attribute(ItemFlags::COPYABLE) {
        turn.world.copy_into(into, key).map(|_| ())
    } else {
        turn.world.insert(into, key)
    };
    match result {
        Ok(()) => turn.ok("confirm_inserted", vec![name, container_name], args),
        Err(CoreError::SelfContainment(_)) => turn.reject("reject_insert_self", vec![name]),
        Err(err) => broken(turn, err),
    }
}

/// Put on a held wearable item.
pub fn wear(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let name = turn.world.item_name(key);
    if !turn.world.player_holds(key) {
        return turn.reject("reject_not_holding", vec![name]);
    }
    let Some(wear) = turn.world.item_mut(key).and_then(|i| i.wear_facet.as_mut()) else {
        return turn.reject("reject_not_wearable", vec![name]);
    };
    if wear.worn {
        return turn.reject("reject_already_worn", vec![name]);
    }
    wear.worn = true;
    turn.ok("confirm_worn", vec![name], args)
}

/// Take off a worn item.
pub fn remove(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let name = turn.world.item_name(key);
    match turn.world.item_mut(key).and_then(|i| i.wear_facet.as_mut()) {
        Some(wear) if wear.worn => {
            wear.worn = false;
            turn.ok("confirm_removed", vec![name], args)
        }
        _ => turn.reject("reject_not_worn", vec![name]),
    }
}

/// Eat or drink an item.
pub fn consume(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let name = turn.world.item_name(key);
    let consumable = turn
        .world
        .item(key)
        .is_some_and(|i| i.has_attribute(ItemFlags::EDIBLE) || i.is_liquid());
    if !consumable {
        return turn.reject("reject_not_consumable", vec![name]);
    }
    match turn.world.destroy(key) {
        Ok(()) => turn.ok("confirm_consumed", vec![name], args),
        Err(err) => broken(turn, err),
    }
}

/// Pour out a liquid, or the liquid inside a container.
pub fn pour(turn: &mut Turn<'_>, _cmd: &Command, args: Vec<Arg>) -> StageResult {
    let Some(key) = item_arg(&args, 0) else {
        return unresolved(turn);
    };
    let Some(liquid) = poured(turn, key) else {
        return turn.reject("reject_not_liquid", vec![turn.world.item_name(key)]);
    };
    let name = turn.world.item_name(liquid);
    match turn.world.destroy(liquid) {
        Ok(()) => turn.ok("confirm_poured", vec![name], args),
        Err(err) => broken(turn, err),
    }
}

fn poured(turn: &Turn<'_>, key: ItemKey) -> Option<ItemKey> {
    let item = turn.world.item(key)?;
    if item.is_liquid() {
        return Some(key);
    }
    item.contents()
        .filter(|inner| turn.world.item(*inner).is_some_and(|i| i.is_liquid()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::chain::Stage;
    use lantern_core::{
        CommandId, DataId, Inventory, InventoryId, Item, Labels, Location, LocationFlags,
        LocationId, World,
    };

    const HERE: ContainerRef = ContainerRef::Location(LocationId(1));
    const HELD: ContainerRef = ContainerRef::Inventory(InventoryId(1));

    fn world() -> World {
        let mut world = World::new("Test", LocationId(1));
        world.add_location(
            Location::new(LocationId(1), Labels::new("hall", "hall", ""))
                .with_attributes(LocationFlags::GIVES_LIGHT),
        );
        world.add_inventory(Inventory::new_default(InventoryId(1), 5));
        world
    }

    fn place(world: &mut World, id: u32, name: &str, flags: ItemFlags, size: u32, at: ContainerRef) -> ItemKey {
        let key = world.add_item(Item::new(DataId(id), flags, Labels::new(name, name, ""), size));
        world.insert(at, key).unwrap();
        key
    }

    fn run(world: &mut World, stage: Stage, args: &[ItemKey]) -> StageResult {
        let config = EngineConfig::default();
        let cmd = Command::new(CommandId(1), "test");
        let mut turn = Turn::new(world, &config, "test", vec![]);
        stage(&mut turn, &cmd, args.iter().map(|k| Arg::Item(*k)).collect())
    }

    #[test]
    fn take_checks_in_order() {
        let mut world = world();
        let troll = place(&mut world, 1, "troll", ItemFlags::SENTIENT | ItemFlags::CONTAINER | ItemFlags::HOLDS_SOLIDS, 9, HERE);
        let gold = place(&mut world, 2, "gold", ItemFlags::PORTABLE, 1, ContainerRef::Item(troll));
        let water = place(&mut world, 3, "water", ItemFlags::LIQUID, 1, HERE);
        let statue = place(&mut world, 4, "statue", ItemFlags::empty(), 1, HERE);
        let anvil = place(&mut world, 5, "anvil", ItemFlags::PORTABLE, 6, HERE);
        let coin = place(&mut world, 6, "coin", ItemFlags::PORTABLE, 1, HERE);

        assert_eq!(run(&mut world, take, &[gold]).render(), "The troll will not let you take the gold.");
        assert_eq!(run(&mut world, take, &[water]).render(), "The water runs through your fingers.");
        assert_eq!(run(&mut world, take, &[statue]).render(), "You cannot take the statue.");
        assert_eq!(
            run(&mut world, take, &[anvil]).render(),
            "The anvil is too heavy to carry with everything else."
        );
        assert_eq!(run(&mut world, take, &[coin]).render(), "Taken.");
        assert!(world.contains(HELD, coin));
        assert_eq!(run(&mut world, take, &[coin]).render(), "You are already carrying the coin.");
    }

    #[test]
    fn drop_unwears_and_drains_liquid() {
        let mut world = world();
        let water = place(&mut world, 1, "water", ItemFlags::LIQUID, 1, HELD);
        let cloak = place(&mut world, 2, "cloak", ItemFlags::PORTABLE | ItemFlags::WEARABLE, 1, HELD);
        run(&mut world, wear, &[cloak]);
        assert!(world.item(cloak).unwrap().is_worn());

        assert_eq!(run(&mut world, drop, &[cloak]).render(), "Dropped.");
        assert!(!world.item(cloak).unwrap().is_worn());
        assert!(world.contains(HERE, cloak));

        assert_eq!(run(&mut world, drop, &[water]).render(), "The water pours away.");
        assert_eq!(world.item(water).unwrap().container(), None);
    }

    #[test]
    fn insert_rules() {
        let mut world = world();
        let flags = ItemFlags::CONTAINER | ItemFlags::HOLDS_SOLIDS | ItemFlags::PORTABLE;
        let jar = place(&mut world, 1, "jar", flags, 3, HERE);
        let pebble = place(&mut world, 2, "pebble", ItemFlags::PORTABLE, 2, HELD);
        let brick = place(&mut world, 3, "brick", ItemFlags::PORTABLE, 4, HERE);
        let oil = place(&mut world, 4, "oil", ItemFlags::LIQUID, 1, HERE);
        let stone = place(&mut world, 5, "stone", ItemFlags::PORTABLE, 1, HERE);

        assert_eq!(run(&mut world, insert, &[stone, pebble]).render(), "The pebble cannot hold anything.");
        assert_eq!(run(&mut world, insert, &[jar, jar]).render(), "You cannot put the jar inside itself.");
        assert_eq!(run(&mut world, insert, &[brick, jar]).render(), "The brick does not fit in the jar.");
        assert_eq!(run(&mut world, insert, &[oil, jar]).render(), "The jar cannot hold the oil.");
        assert_eq!(run(&mut world, insert, &[pebble, jar]).render(), "You put the pebble into the jar.");
        assert!(world.contains(ContainerRef::Item(jar), pebble));
        assert_eq!(
            run(&mut world, insert, &[stone, jar]).render(),
            "The jar already holds the pebble."
        );
    }

    #[test]
    fn copyable_items_stay_put() {
        let mut world = world();
        let flags = ItemFlags::CONTAINER | ItemFlags::HOLDS_LIQUIDS | ItemFlags::PORTABLE;
        let bottle = place(&mut world, 1, "bottle", flags, 2, HELD);
        let lake = place(&mut world, 2, "water", ItemFlags::LIQUID | ItemFlags::COPYABLE, 1, HERE);

        assert!(run(&mut world, insert, &[lake, bottle]).success);
        assert!(world.contains(HERE, lake));
        let copy = world.item(bottle).unwrap().contents().unwrap();
        assert_ne!(copy, lake);
        assert_eq!(world.item(copy).unwrap().copy_of, Some(lake));

        let arena = world.items().count();
        assert_eq!(run(&mut world, insert, &[lake, bottle]).render(), "The bottle already holds the water.");
        assert_eq!(world.items().count(), arena);

        assert_eq!(run(&mut world, pour, &[bottle]).render(), "The water pours away.");
        assert_eq!(world.item(bottle).unwrap().contents(), None);
        assert_eq!(run(&mut world, pour, &[bottle]).render(), "You cannot pour the bottle.");

        assert!(run(&mut world, insert, &[lake, bottle]).success);
        assert_eq!(world.item(bottle).unwrap().contents(), Some(copy));
        assert_eq!(world.items().count(), arena);
    }

    #[test]
    fn wear_remove_consume() {
        let mut world = world();
        let hat = place(&mut world, 1, "hat", ItemFlags::PORTABLE | ItemFlags::WEARABLE, 1, HELD);
        let bread = place(&mut world, 2, "bread", ItemFlags::PORTABLE | ItemFlags::EDIBLE, 1, HELD);

        assert_eq!(run(&mut world, remove, &[hat]).render(), "You are not wearing the hat.");
        assert_eq!(run(&mut world, wear, &[bread]).render(), "You cannot wear the bread.");
        assert_eq!(run(&mut world, wear, &[hat]).render(), "You are now wearing the hat.");
        assert_eq!(run(&mut world, wear, &[hat]).render(), "You are already wearing the hat.");
        assert_eq!(run(&mut world, remove, &[hat]).render(), "You take off the hat.");

        assert_eq!(run(&mut world, consume, &[hat]).render(), "You cannot consume the hat.");
        assert_eq!(run(&mut world, consume, &[bread]).render(), "You consume the bread.");
        assert!(!world.player_holds(bread));
    }
}
