// Layer actions

use crate::command::actions::{ValueChange, apply_changes, lookup_all, require_all};
use crate::command::trait_def::{ActionError, ActionResult, EntityKind, Rejection, UndoableAction};
use crate::map::{Beatmap, DEFAULT_LAYER, EditorLayer, HitObject, HitObjectId, LayerId};

const KIND: EntityKind = EntityKind::Layer;

/// Resolve a user layer, refusing the reserved default layer
fn user_layer(map: &Beatmap, id: LayerId) -> ActionResult<&EditorLayer> {
    if id == DEFAULT_LAYER {
        return Err(Rejection::ReservedLayer.into());
    }
    map.layer(id)
        .ok_or_else(|| Rejection::unknown(KIND, id).into())
}

fn edit_layer(
    map: &mut Beatmap,
    id: LayerId,
    f: impl FnOnce(&mut EditorLayer),
) -> ActionResult<()> {
    let layer = map
        .layer_mut(id)
        .ok_or_else(|| ActionError::missing(KIND, id))?;
    f(layer);
    Ok(())
}

fn set_layer(object: &mut HitObject, layer: LayerId) {
    object.layer = layer;
}

/// Append a new layer
#[derive(Debug)]
pub struct CreateLayer {
    pub(crate) layer: EditorLayer,
}

impl CreateLayer {
    pub fn new(map: &Beatmap, layer: EditorLayer) -> ActionResult<Self> {
        if layer.id == DEFAULT_LAYER {
            return Err(Rejection::ReservedLayer.into());
        }
        if map.has_layer(layer.id) {
            return Err(ActionError::duplicate(KIND, layer.id));
        }
        Ok(Self { layer })
    }

    pub fn layer(&self) -> &EditorLayer {
        &self.layer
    }
}

impl UndoableAction for CreateLayer {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        if map.has_layer(self.layer.id) {
            return Err(ActionError::duplicate(KIND, self.layer.id));
        }
        map.layers.push(self.layer.clone());
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        let index = map
            .layer_index(self.layer.id)
            .ok_or_else(|| ActionError::missing(KIND, self.layer.id))?;
        map.layers.remove(index);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create Layer {}", self.layer.name)
    }
}

/// Delete a layer, moving its hit objects to the default layer
#[derive(Debug)]
pub struct RemoveLayer {
    pub(crate) layer: EditorLayer,
    pub(crate) index: usize,
    pub(crate) members: Vec<HitObjectId>,
}

impl RemoveLayer {
    pub fn new(map: &Beatmap, id: LayerId) -> ActionResult<Self> {
        let layer = user_layer(map, id)?.clone();
        let index = map.layer_index(id).unwrap_or(map.layers.len());
        Ok(Self {
            layer,
            index,
            members: map.objects_on_layer(id),
        })
    }
}

impl UndoableAction for RemoveLayer {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        let index = map
            .layer_index(self.layer.id)
            .ok_or_else(|| ActionError::missing(KIND, self.layer.id))?;
        require_all(&map.hit_objects, self.members.iter().copied(), EntityKind::HitObject)?;

        map.layers.remove(index);
        for &id in &self.members {
            map.hit_objects.update(id, |object| object.layer = DEFAULT_LAYER);
        }
        Ok(())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        if map.has_layer(self.layer.id) {
            return Err(ActionError::duplicate(KIND, self.layer.id));
        }
        require_all(&map.hit_objects, self.members.iter().copied(), EntityKind::HitObject)?;

        let index = self.index.min(map.layers.len());
        map.layers.insert(index, self.layer.clone());
        for &id in &self.members {
            map.hit_objects.update(id, |object| object.layer = self.layer.id);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Remove Layer {}", self.layer.name)
    }
}

#[derive(Debug)]
pub struct RenameLayer {
    pub(crate) layer: LayerId,
    pub(crate) old_name: String,
    pub(crate) new_name: String,
}

impl RenameLayer {
    pub fn new(map: &Beatmap, id: LayerId, name: impl Into<String>) -> ActionResult<Self> {
        let layer = user_layer(map, id)?;
        let new_name = name.into();
        if new_name.trim().is_empty() || new_name == layer.name {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            layer: id,
            old_name: layer.name.clone(),
            new_name,
        })
    }
}

impl UndoableAction for RenameLayer {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.name = self.new_name.clone())
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.name = self.old_name.clone())
    }

    fn description(&self) -> String {
        format!("Rename Layer to {}", self.new_name)
    }
}

#[derive(Debug)]
pub struct ColorLayer {
    pub(crate) layer: LayerId,
    pub(crate) old_color: [u8; 3],
    pub(crate) new_color: [u8; 3],
}

impl ColorLayer {
    pub fn new(map: &Beatmap, id: LayerId, color: [u8; 3]) -> ActionResult<Self> {
        let layer = user_layer(map, id)?;
        if layer.color == color {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self {
            layer: id,
            old_color: layer.color,
            new_color: color,
        })
    }
}

impl UndoableAction for ColorLayer {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.color = self.new_color)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.color = self.old_color)
    }

    fn description(&self) -> String {
        let [r, g, b] = self.new_color;
        format!("Color Layer #{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[derive(Debug)]
pub struct ToggleLayerVisibility {
    pub(crate) layer: LayerId,
    pub(crate) was_hidden: bool,
}

impl ToggleLayerVisibility {
    pub fn new(map: &Beatmap, id: LayerId) -> ActionResult<Self> {
        let layer = user_layer(map, id)?;
        Ok(Self {
            layer: id,
            was_hidden: layer.hidden,
        })
    }
}

impl UndoableAction for ToggleLayerVisibility {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.hidden = !self.was_hidden)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        edit_layer(map, self.layer, |layer| layer.hidden = self.was_hidden)
    }

    fn description(&self) -> String {
        if self.was_hidden {
            "Show Layer".to_string()
        } else {
            "Hide Layer".to_string()
        }
    }
}

/// Move hit objects onto a layer (the default layer included)
#[derive(Debug)]
pub struct MoveToLayer {
    pub(crate) layer: LayerId,
    pub(crate) changes: Vec<ValueChange<LayerId>>,
}

impl MoveToLayer {
    pub fn new(map: &Beatmap, ids: &[HitObjectId], layer: LayerId) -> ActionResult<Self> {
        if !map.has_layer(layer) {
            return Err(Rejection::unknown(KIND, layer).into());
        }
        let changes: Vec<ValueChange<LayerId>> =
            lookup_all(&map.hit_objects, ids, EntityKind::HitObject)?
                .iter()
                .filter(|object| object.layer != layer)
                .map(|object| ValueChange::new(object.id, object.layer, layer))
                .collect();
        if changes.is_empty() {
            return Err(Rejection::EmptyTarget.into());
        }
        Ok(Self { layer, changes })
    }
}

impl UndoableAction for MoveToLayer {
    fn perform(&self, map: &mut Beatmap) -> ActionResult<()> {
        if !map.has_layer(self.layer) {
            return Err(ActionError::missing(KIND, self.layer));
        }
        apply_changes(&mut map.hit_objects, &self.changes, EntityKind::HitObject, true, set_layer)
    }

    fn undo(&self, map: &mut Beatmap) -> ActionResult<()> {
        apply_changes(&mut map.hit_objects, &self.changes, EntityKind::HitObject, false, set_layer)
    }

    fn description(&self) -> String {
        format!("Move {} Hit Objects to Layer", self.changes.len())
    }
}
