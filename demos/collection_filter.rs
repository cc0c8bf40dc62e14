//! Collection and single-entity filters over a small scene.
//!
//! This example shows how to:
//! - Register tags and entities
//! - Narrow a set of entities with a collection filter
//! - Check one entity with a tag filter
//! - Rank tag names against a search term

use bevy_tagger::{SearchMode, Tag, TagRegistry};

fn main() {
    println!("=== Collection Filter Example ===\n");

    let mut registry = TagRegistry::<&'static str>::new();

    let cube = Tag::new("Cube");
    let sphere = Tag::new("Sphere");
    let platonic = Tag::new("Platonic");
    for tag in [&cube, &sphere, &platonic] {
        registry.register_tag(tag);
    }

    registry.initialize_entity("Dice", [&cube, &platonic]);
    registry.initialize_entity("Ball", [&sphere]);
    registry.initialize_entity("Empty", []);

    // 1. Collection filters
    println!("with Cube:            {:?}", registry.filter_all().with_tag(&cube).sorted_matches());
    println!("without Platonic:     {:?}", registry.filter_all().without_tag(&platonic).sorted_matches());
    println!(
        "with any Cube/Sphere: {:?}",
        registry.filter_all().with_any_tags([&cube, &sphere]).sorted_matches()
    );
    println!("untagged:             {:?}", registry.untagged());
    println!();

    // 2. Single entity
    let is_platonic_cube = registry
        .filter_entity("Dice")
        .with_tag(&cube)
        .with_tag(&platonic)
        .is_match();
    println!("Dice is a platonic cube: {}", is_platonic_cube);
    println!();

    // 3. Editing through the tag-set view
    if let Some(mut ball) = registry.tagger_mut("Ball") {
        ball.add_tag(&platonic);
    }
    println!("Platonic after edit:  {:?}", registry.filter_all().with_tag(&platonic).sorted_matches());
    println!();

    // 4. Search
    registry.register_tag(&Tag::new("CubeMap"));
    registry.register_tag(&Tag::new("Incubator"));
    let ranked: Vec<&str> = registry
        .search_tags("cub", SearchMode::Relevance)
        .into_iter()
        .map(Tag::name)
        .collect();
    println!("search 'cub':         {:?}", ranked);

    let prefixed: Vec<&str> = registry
        .search_tags("^sp", SearchMode::Relevance)
        .into_iter()
        .map(Tag::name)
        .collect();
    println!("search '^sp':         {:?}", prefixed);
}
