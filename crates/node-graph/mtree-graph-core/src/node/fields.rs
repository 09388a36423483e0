//! Per-type node fields.
//!
//! Each node type owns one plain struct; [`NodeKind`] is the sum over them.
//! Defaults match what a freshly added node shows in the editor.

use serde::{Deserialize, Serialize};

use super::NodeType;
use crate::curve::CurveMapping;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFields {
    pub iterations: u32,
    pub stay_under_ground: bool,
    pub radius: f32,
}

impl RootFields {
    pub const MIN_RADIUS: f32 = 0.0001;
}

impl Default for RootFields {
    fn default() -> Self {
        Self {
            iterations: 1,
            stay_under_ground: true,
            radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrunkFields {
    pub preserve_trunk: bool,
    /// Only meaningful while `preserve_trunk` is set.
    pub finish_trunk: bool,
    pub use_grease_pencil: bool,
    pub radius: f32,
    pub trunk_iterations: u32,
    pub trunk_end: u32,
}

impl Default for TrunkFields {
    fn default() -> Self {
        Self {
            preserve_trunk: true,
            finish_trunk: false,
            use_grease_pencil: false,
            radius: 1.0,
            trunk_iterations: 6,
            trunk_end: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchFields {
    pub iterations: u32,
}

impl Default for BranchFields {
    fn default() -> Self {
        Self { iterations: 25 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFields {
    pub seed: i32,
    pub uv: bool,
    pub create_material: bool,
    /// Bark material name, used when `create_material` is off.
    pub material: String,
}

impl Default for OutputFields {
    fn default() -> Self {
        Self {
            seed: 42,
            uv: true,
            create_material: false,
            material: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwigFields {
    pub seed: i32,
    pub leaf_size: f32,
    pub leaf_object: String,
    pub leaf_proba: f32,
    pub leaf_weight: f32,
    pub iterations: u32,
    pub material: String,
}

impl Default for TwigFields {
    fn default() -> Self {
        Self {
            seed: 42,
            leaf_size: 1.0,
            leaf_object: String::new(),
            leaf_proba: 0.5,
            leaf_weight: 0.2,
            iterations: 9,
            material: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcesFields {
    pub use_force_field: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexFields {
    pub create_leaf_vertex_group: bool,
    pub create_radius_vertex_paint: bool,
    pub group_expansion: u32,
}

impl Default for VertexFields {
    fn default() -> Self {
        Self {
            create_leaf_vertex_group: true,
            create_radius_vertex_paint: true,
            group_expansion: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObstacleMode {
    /// Branches grow around the obstacle.
    #[default]
    Avoid,
    /// Branches are cut at the obstacle boundary.
    Cut,
}

impl ObstacleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleMode::Avoid => "AVOID",
            ObstacleMode::Cut => "CUT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleFields {
    pub obstacle: String,
    pub flip_normals: bool,
    pub mode: ObstacleMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleFields {
    pub number: u32,
    pub viewport_number: u32,
    pub leaf_object: String,
    pub leaf_size: f32,
    pub emitter: bool,
}

impl Default for ParticleFields {
    fn default() -> Self {
        Self {
            number: 1000,
            viewport_number: 500,
            leaf_object: String::new(),
            leaf_size: 1.0,
            emitter: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningFields {
    pub voxel_size: u32,
}

impl Default for PruningFields {
    fn default() -> Self {
        Self { voxel_size: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmatureFields {
    pub max_bones_iteration: u32,
}

impl Default for ArmatureFields {
    fn default() -> Self {
        Self {
            max_bones_iteration: 5,
        }
    }
}

/// Quantity a Curve node maps along its x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurveDriver {
    #[default]
    Iteration,
    Radius,
    Height,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveFields {
    /// Ignored for iteration-driven curves.
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
    pub driver: CurveDriver,
    pub mapping: CurveMapping,
}

impl Default for CurveFields {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            driver: CurveDriver::Iteration,
            mapping: CurveMapping::default(),
        }
    }
}

impl CurveFields {
    /// Map a driver value through the curve into `[y_min, y_max]`.
    ///
    /// Iteration drivers are expected to be normalised already; other drivers
    /// are rescaled from `[x_min, x_max]`.
    pub fn sample(&self, driver_value: f32) -> f32 {
        let t = match self.driver {
            CurveDriver::Iteration => driver_value,
            CurveDriver::Radius | CurveDriver::Height => {
                let span = self.x_max - self.x_min;
                if span.abs() <= f32::EPSILON {
                    0.0
                } else {
                    (driver_value - self.x_min) / span
                }
            }
        };
        let y = self.mapping.evaluate(t.clamp(0.0, 1.0));
        self.y_min + (self.y_max - self.y_min) * y
    }
}

/// Node variant together with its fields.
///
/// Serialized internally tagged, e.g. `{ "type": "root", "iterations": 0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Root(RootFields),
    Trunk(TrunkFields),
    Branch(BranchFields),
    Output(OutputFields),
    Twig(TwigFields),
    Forces(ForcesFields),
    Vertex(VertexFields),
    Obstacle(ObstacleFields),
    Particle(ParticleFields),
    Pruning(PruningFields),
    Armature(ArmatureFields),
    Curve(CurveFields),
}

impl NodeKind {
    /// Default fields for `ty`.
    pub fn new(ty: NodeType) -> Self {
        match ty {
            NodeType::Root => NodeKind::Root(RootFields::default()),
            NodeType::Trunk => NodeKind::Trunk(TrunkFields::default()),
            NodeType::Branch => NodeKind::Branch(BranchFields::default()),
            NodeType::Output => NodeKind::Output(OutputFields::default()),
            NodeType::Twig => NodeKind::Twig(TwigFields::default()),
            NodeType::Forces => NodeKind::Forces(ForcesFields::default()),
            NodeType::Vertex => NodeKind::Vertex(VertexFields::default()),
            NodeType::Obstacle => NodeKind::Obstacle(ObstacleFields::default()),
            NodeType::Particle => NodeKind::Particle(ParticleFields::default()),
            NodeType::Pruning => NodeKind::Pruning(PruningFields::default()),
            NodeType::Armature => NodeKind::Armature(ArmatureFields::default()),
            NodeType::Curve => NodeKind::Curve(CurveFields::default()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root(_) => NodeType::Root,
            NodeKind::Trunk(_) => NodeType::Trunk,
            NodeKind::Branch(_) => NodeType::Branch,
            NodeKind::Output(_) => NodeType::Output,
            NodeKind::Twig(_) => NodeType::Twig,
            NodeKind::Forces(_) => NodeType::Forces,
            NodeKind::Vertex(_) => NodeType::Vertex,
            NodeKind::Obstacle(_) => NodeType::Obstacle,
            NodeKind::Particle(_) => NodeType::Particle,
            NodeKind::Pruning(_) => NodeType::Pruning,
            NodeKind::Armature(_) => NodeType::Armature,
            NodeKind::Curve(_) => NodeType::Curve,
        }
    }
}

/// Typed access to one variant's fields without exposing the enum mutably.
pub trait NodeFields: Sized {
    const TYPE: NodeType;

    fn from_kind(kind: &NodeKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

macro_rules! impl_node_fields {
    ($($variant:ident => $fields:ty),+ $(,)?) => {
        $(
            impl NodeFields for $fields {
                const TYPE: NodeType = NodeType::$variant;

                fn from_kind(kind: &NodeKind) -> Option<&Self> {
                    match kind {
                        NodeKind::$variant(fields) => Some(fields),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                    match kind {
                        NodeKind::$variant(fields) => Some(fields),
                        _ => None,
                    }
                }
            }

            impl From<$fields> for NodeKind {
                fn from(fields: $fields) -> Self {
                    NodeKind::$variant(fields)
                }
            }
        )+
    };
}

impl_node_fields! {
    Root => RootFields,
    Trunk => TrunkFields,
    Branch => BranchFields,
    Output => OutputFields,
    Twig => TwigFields,
    Forces => ForcesFields,
    Vertex => VertexFields,
    Obstacle => ObstacleFields,
    Particle => ParticleFields,
    Pruning => PruningFields,
    Armature => ArmatureFields,
    Curve => CurveFields,
}
