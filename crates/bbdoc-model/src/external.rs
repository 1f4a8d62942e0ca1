//! Engine classes known by name only.
//!
//! Local classes usually inherit from one of these. The list is not complete;
//! a parent missing from it leaves the child as a root of the index.

use crate::entity::ClassEntity;

/// `(class, parent)` pairs. `Object` is the only root.
const ENGINE_CLASSES: &[(&str, &str)] = &[
    ("Object", ""),
    ("RefCounted", "Object"),
    ("Resource", "RefCounted"),
    ("Node", "Object"),
    ("Node3D", "Node"),
    ("VisualInstance3D", "Node3D"),
    ("GeometryInstance3D", "VisualInstance3D"),
    ("MeshInstance3D", "GeometryInstance3D"),
    ("CanvasItem", "Node"),
    ("Node2D", "CanvasItem"),
    ("Control", "CanvasItem"),
    ("Container", "Control"),
    ("Button", "BaseButton"),
    ("BaseButton", "Control"),
    ("Mesh", "Resource"),
    ("ArrayMesh", "Mesh"),
    ("PrimitiveMesh", "Mesh"),
    ("Material", "Resource"),
    ("ShaderMaterial", "Material"),
    ("StandardMaterial3D", "BaseMaterial3D"),
    ("BaseMaterial3D", "Material"),
    ("Shader", "Resource"),
    ("Texture", "Resource"),
    ("Texture2D", "Texture"),
    ("Texture3D", "Texture"),
    ("ImageTexture", "Texture2D"),
    ("Image", "Resource"),
    ("Shape3D", "Resource"),
    ("ConcavePolygonShape3D", "Shape3D"),
    ("Noise", "Resource"),
    ("FastNoiseLite", "Noise"),
    ("Curve", "Resource"),
    ("StreamPeer", "RefCounted"),
    ("StreamPeerBuffer", "StreamPeer"),
    ("EditorPlugin", "Node"),
    ("EditorInspectorPlugin", "RefCounted"),
    ("MultiplayerSynchronizer", "Node"),
];

/// Entities for the engine classes, flagged as not local.
#[must_use]
pub fn catalog() -> Vec<ClassEntity> {
    ENGINE_CLASSES
        .iter()
        .map(|&(name, parent)| ClassEntity::external(name, parent))
        .collect()
}
