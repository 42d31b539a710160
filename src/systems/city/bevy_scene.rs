// scene backend that turns generator calls into bevy entities
// every entity it creates carries CityObject so a later session can find it again

use std::collections::HashSet;

use bevy::prelude::*;

use crate::config::GROUND_NAME;
use super::error::SceneError;
use super::scene::{Scene, check_box_dimensions, check_plane_dimensions};

/// Marker for everything the generator spawned.
#[derive(Component)]
pub struct CityObject;

pub struct BevyScene<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    live: HashSet<Entity>,
    selected: Vec<Entity>,
    building_material: Option<Handle<StandardMaterial>>,
    ground_material: Option<Handle<StandardMaterial>>,
}

impl<'a, 'w, 's> BevyScene<'a, 'w, 's> {
    /// `existing` are the CityObject entities already in the world.
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        existing: impl IntoIterator<Item = Entity>,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            live: existing.into_iter().collect(),
            selected: Vec::new(),
            building_material: None,
            ground_material: None,
        }
    }

    fn check_live(&self, entity: Entity) -> Result<(), SceneError> {
        if self.live.contains(&entity) {
            Ok(())
        } else {
            Err(SceneError::UnknownHandle(format!("{entity}")))
        }
    }

    fn building_material(&mut self) -> Handle<StandardMaterial> {
        let materials = &mut *self.materials;
        self.building_material
            .get_or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: Color::srgb(0.8, 0.8, 0.9),
                    alpha_mode: AlphaMode::Opaque,
                    ..default()
                })
            })
            .clone()
    }

    fn ground_material(&mut self) -> Handle<StandardMaterial> {
        let materials = &mut *self.materials;
        self.ground_material
            .get_or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: Color::srgb(0.22, 0.24, 0.27),
                    perceptual_roughness: 1.0,
                    ..default()
                })
            })
            .clone()
    }

    fn spawn(&mut self, bundle: impl Bundle) -> Entity {
        let entity = self.commands.spawn((CityObject, bundle)).id();
        self.live.insert(entity);
        entity
    }
}

impl Scene for BevyScene<'_, '_, '_> {
    type Handle = Entity;

    fn create_box(&mut self, width: f32, depth: f32, height: f32, name: &str) -> Result<Entity, SceneError> {
        check_box_dimensions(name, width, depth, height)?;
        let mesh = self.meshes.add(Cuboid::new(width, height, depth));
        let material = self.building_material();

        Ok(self.spawn((
            Name::new(name.to_string()),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::default(),
        )))
    }

    fn create_plane(&mut self, width: f32, depth: f32) -> Result<Entity, SceneError> {
        check_plane_dimensions(width, depth)?;
        let mesh = self.meshes.add(Plane3d::default().mesh().size(width, depth));
        let material = self.ground_material();

        Ok(self.spawn((
            Name::new(GROUND_NAME),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::default(),
        )))
    }

    fn group_under(&mut self, child: Entity, parent: Entity) -> Result<(), SceneError> {
        self.check_live(child)?;
        self.check_live(parent)?;
        self.commands.entity(parent).add_child(child);
        Ok(())
    }

    fn translate(&mut self, handle: Entity, position: Vec3) -> Result<(), SceneError> {
        self.check_live(handle)?;
        self.commands.entity(handle).insert(Transform::from_translation(position));
        Ok(())
    }

    fn create_empty_group(&mut self, name: &str) -> Result<Entity, SceneError> {
        Ok(self.spawn((
            Name::new(name.to_string()),
            Transform::default(),
            Visibility::default(),
        )))
    }

    fn select_all(&mut self) {
        self.selected = self.live.iter().copied().collect();
    }

    fn delete_selected(&mut self) {
        for entity in self.selected.drain(..) {
            self.live.remove(&entity);
            // children may already be gone through their parent
            self.commands.entity(entity).try_despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::CityConfig;
    use crate::systems::city::generator::generate_city;
    use crate::systems::city::scene::clear_scene;
    use bevy::ecs::world::CommandQueue;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn city_objects(world: &mut World) -> Vec<Entity> {
        world.query_filtered::<Entity, With<CityObject>>().iter(world).collect()
    }

    #[test]
    fn spawns_city_hierarchy() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let config = CityConfig { block_grid_width: 2, block_grid_depth: 1, ..default() };

        let report = {
            let mut commands = Commands::new(&mut queue, &world);
            let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, std::iter::empty());
            let mut rng = StdRng::seed_from_u64(21);
            generate_city(&mut scene, &mut rng, &config).unwrap()
        };
        queue.apply(&mut world);

        let buildings = report.layout.buildings as usize;
        assert_eq!(city_objects(&mut world).len(), buildings + 2);

        let children = world.get::<Children>(report.root).unwrap();
        assert_eq!(children.len(), buildings + 1);
        assert!(children.contains(&report.ground));

        let name = world.get::<Name>(report.root).unwrap();
        assert_eq!(name.as_str(), "city");
        // every building shares one material
        assert_eq!(materials.len(), 2);
    }

    #[test]
    fn clear_despawns_previous_session() {
        let mut world = World::new();
        let mut queue = CommandQueue::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let config = CityConfig { block_grid_width: 1, block_grid_depth: 1, ..default() };

        {
            let mut commands = Commands::new(&mut queue, &world);
            let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, std::iter::empty());
            let mut rng = StdRng::seed_from_u64(2);
            generate_city(&mut scene, &mut rng, &config).unwrap();
        }
        queue.apply(&mut world);
        let existing = city_objects(&mut world);
        assert!(!existing.is_empty());

        {
            let mut commands = Commands::new(&mut queue, &world);
            let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, existing);
            clear_scene(&mut scene);
        }
        queue.apply(&mut world);

        assert!(city_objects(&mut world).is_empty());
    }

    #[test]
    fn foreign_entities_are_unknown_handles() {
        let mut world = World::new();
        let stranger = world.spawn_empty().id();
        let mut queue = CommandQueue::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();

        let mut commands = Commands::new(&mut queue, &world);
        let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, std::iter::empty());
        let root = scene.create_empty_group("city").unwrap();

        assert!(matches!(scene.group_under(stranger, root), Err(SceneError::UnknownHandle(_))));
        assert!(scene.translate(stranger, Vec3::ONE).is_err());
    }
}
