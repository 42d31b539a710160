// in-memory scene, the non-gui backend
// objects live in a map keyed by creation order so iteration is deterministic

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bevy::prelude::*;

use crate::config::GROUND_NAME;
use super::error::SceneError;
use super::scene::{Scene, check_box_dimensions, check_plane_dimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Box { width: f32, depth: f32, height: f32 },
    Plane { width: f32, depth: f32 },
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub primitive: Primitive,
    pub parent: Option<ObjectId>,
    pub translation: Vec3,
}

#[derive(Debug, Default, Clone)]
pub struct SceneBuffer {
    objects: BTreeMap<ObjectId, SceneObject>,
    selection: Vec<ObjectId>,
    next_id: u32,
}

impl SceneBuffer {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// First object carrying `name`, in creation order.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|(_, object)| object.name == name).map(|(id, _)| id)
    }

    pub fn boxes(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().filter(|o| matches!(o.primitive, Primitive::Box { .. }))
    }

    pub fn planes(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().filter(|o| matches!(o.primitive, Primitive::Plane { .. }))
    }

    pub fn groups(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().filter(|o| o.primitive == Primitive::Group)
    }

    pub fn children_of(&self, parent: ObjectId) -> Vec<ObjectId> {
        self.iter()
            .filter(|(_, object)| object.parent == Some(parent))
            .map(|(id, _)| id)
            .collect()
    }

    fn insert(&mut self, name: &str, primitive: Primitive) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, SceneObject {
            name: name.to_string(),
            primitive,
            parent: None,
            translation: Vec3::ZERO,
        });
        id
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, SceneError> {
        self.objects.get_mut(&id).ok_or_else(|| SceneError::UnknownHandle(id.to_string()))
    }
}

impl Scene for SceneBuffer {
    type Handle = ObjectId;

    fn create_box(&mut self, width: f32, depth: f32, height: f32, name: &str) -> Result<ObjectId, SceneError> {
        check_box_dimensions(name, width, depth, height)?;
        Ok(self.insert(name, Primitive::Box { width, depth, height }))
    }

    fn create_plane(&mut self, width: f32, depth: f32) -> Result<ObjectId, SceneError> {
        check_plane_dimensions(width, depth)?;
        Ok(self.insert(GROUND_NAME, Primitive::Plane { width, depth }))
    }

    fn group_under(&mut self, child: ObjectId, parent: ObjectId) -> Result<(), SceneError> {
        if !self.objects.contains_key(&parent) {
            return Err(SceneError::UnknownHandle(parent.to_string()));
        }
        self.object_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn translate(&mut self, handle: ObjectId, position: Vec3) -> Result<(), SceneError> {
        self.object_mut(handle)?.translation = position;
        Ok(())
    }

    fn create_empty_group(&mut self, name: &str) -> Result<ObjectId, SceneError> {
        Ok(self.insert(name, Primitive::Group))
    }

    fn select_all(&mut self) {
        self.selection = self.objects.keys().copied().collect();
    }

    fn delete_selected(&mut self) {
        for id in self.selection.drain(..) {
            self.objects.remove(&id);
        }
        // orphans left behind by a partial selection fall back to the top level
        let live: BTreeSet<ObjectId> = self.objects.keys().copied().collect();
        for object in self.objects.values_mut() {
            if object.parent.is_some_and(|p| !live.contains(&p)) {
                object.parent = None;
            }
        }
    }
}
