//! Bevy plugin keeps the registry resource in sync with `Tagged` components.

use bevy::prelude::*;
use bevy_tagger::bevy::{TaggerPlugin, Tagged};
use bevy_tagger::{Tag, TagRegistry, TagsConfig};

fn registry(app: &App) -> &TagRegistry<Entity> {
    app.world().resource::<TagRegistry<Entity>>()
}

#[test]
fn spawned_entities_are_registered() {
    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());

    let cube = Tag::new("Cube");
    let tagged = app.world_mut().spawn(Tagged::new([cube.clone()])).id();
    let bare = app.world_mut().spawn(Tagged::default()).id();
    app.update();

    let reg = registry(&app);
    assert!(reg.tagger(tagged).unwrap().has_tag(&cube));
    assert!(reg.contains_tag(&cube));
    assert!(reg.is_untagged(bare));
    assert_eq!(reg.check_consistency(), Ok(()));
}

#[test]
fn despawned_entities_are_unregistered() {
    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());

    let cube = Tag::new("Cube");
    let entity = app.world_mut().spawn(Tagged::new([cube.clone()])).id();
    app.update();
    assert!(registry(&app).contains_entity(entity));

    app.world_mut().despawn(entity);
    app.update();

    let reg = registry(&app);
    assert!(!reg.contains_entity(entity));
    assert_eq!(reg.tagged_entities(&cube).count(), 0);
    assert_eq!(reg.check_consistency(), Ok(()));
}

#[test]
fn component_edits_are_mirrored() {
    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());

    let cube = Tag::new("Cube");
    let red = Tag::new("Red");
    let entity = app.world_mut().spawn(Tagged::new([cube.clone()])).id();
    app.update();

    {
        let mut tagged = app.world_mut().get_mut::<Tagged>(entity).unwrap();
        tagged.remove(&cube);
        tagged.insert(red.clone());
    }
    app.update();

    let reg = registry(&app);
    let tagger = reg.tagger(entity).unwrap();
    assert!(!tagger.has_tag(&cube));
    assert!(tagger.has_tag(&red));
    assert_eq!(reg.filter_all().with_tag(&red).sorted_matches(), vec![entity]);
}

#[test]
fn deleted_tags_stay_deleted_after_component_edits() {
    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());

    let doomed = Tag::new("Doomed");
    let other = Tag::new("Other");
    let entity = app.world_mut().spawn(Tagged::new([doomed.clone()])).id();
    let idle = app.world_mut().spawn(Tagged::new([doomed.clone()])).id();
    app.update();

    app.world_mut()
        .resource_mut::<TagRegistry<Entity>>()
        .unregister_tag(&doomed);
    app.world_mut()
        .get_mut::<Tagged>(entity)
        .unwrap()
        .insert(other.clone());
    app.update();

    let reg = registry(&app);
    assert!(!reg.contains_tag(&doomed));
    assert!(!reg.tagger(entity).unwrap().has_tag(&doomed));
    assert!(reg.tagger(entity).unwrap().has_tag(&other));
    assert!(reg.is_untagged(idle));
    assert_eq!(reg.check_consistency(), Ok(()));

    // Components no longer carry the deleted tag either
    assert!(!app.world().get::<Tagged>(entity).unwrap().has(&doomed));
    assert!(!app.world().get::<Tagged>(idle).unwrap().has(&doomed));
}

#[test]
fn reinserting_a_deleted_tag_is_ignored() {
    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());

    let doomed = Tag::new("Doomed");
    let entity = app.world_mut().spawn(Tagged::new([doomed.clone()])).id();
    app.update();

    app.world_mut()
        .resource_mut::<TagRegistry<Entity>>()
        .unregister_tag(&doomed);
    app.update();

    app.world_mut()
        .get_mut::<Tagged>(entity)
        .unwrap()
        .insert(doomed.clone());
    app.update();

    let reg = registry(&app);
    assert!(!reg.contains_tag(&doomed));
    assert!(reg.is_untagged(entity));
    assert!(app.world().get::<Tagged>(entity).unwrap().is_empty());

    // Explicit registration brings it back for later edits
    app.world_mut()
        .resource_mut::<TagRegistry<Entity>>()
        .register_tag(&doomed);
    app.world_mut()
        .get_mut::<Tagged>(entity)
        .unwrap()
        .insert(doomed.clone());
    app.update();

    assert!(registry(&app).tagger(entity).unwrap().has_tag(&doomed));
}

#[test]
fn plugin_from_config_preregisters_tags() {
    let config = TagsConfig::from_str(
        r##"
[[tags]]
name = "Enemy"
color = "#FF0000"

[[tags]]
name = "Loot"
"##,
    )
    .unwrap();

    let mut app = App::new();
    app.add_plugins(TaggerPlugin::from_config(config));

    let reg = registry(&app);
    assert_eq!(reg.tag_count(), 2);

    let enemy = reg.lookup_tag_by_name("Enemy").unwrap();
    assert_eq!(enemy.color().to_rgb(), [255, 0, 0]);
    assert_eq!(reg.tagged_entities(enemy).count(), 0);
}

#[test]
fn filters_from_a_system() {
    #[derive(Resource, Default)]
    struct EnemyCount(usize);

    fn count_enemies(registry: Res<TagRegistry<Entity>>, mut count: ResMut<EnemyCount>) {
        if let Some(enemy) = registry.lookup_tag_by_name("Enemy") {
            count.0 = registry.filter_all().with_tag(enemy).len();
        }
    }

    let mut app = App::new();
    app.add_plugins(TaggerPlugin::new());
    app.init_resource::<EnemyCount>();
    app.add_systems(Update, count_enemies);

    let enemy = Tag::new("Enemy");
    app.world_mut().spawn(Tagged::new([enemy.clone()]));
    app.world_mut().spawn(Tagged::new([enemy]));
    app.world_mut().spawn(Tagged::default());
    app.update();

    assert_eq!(app.world().resource::<EnemyCount>().0, 2);
}
