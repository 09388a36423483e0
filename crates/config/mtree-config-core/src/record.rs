//! The flat configuration record read by the growth engine.
//!
//! Every parameter lives in one struct so a build can snapshot it in a single
//! clone. Fields are also addressable through [`ConfigField`], which is what the
//! graph synchronizer uses to emit typed writes without knowing the struct
//! layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::value::{ConfigValue, ValueKind};
use crate::write_ops::ConfigBatch;

macro_rules! tree_config {
    (@ty Int) => { i32 };
    (@ty Float) => { f32 };
    (@ty Bool) => { bool };
    (@ty Text) => { String };

    ($(
        $(#[$meta:meta])*
        $variant:ident => $field:ident : $kind:ident = $default:expr
    ),+ $(,)?) => {
        /// Parameters consumed by the growth engine.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct TreeConfig {
            $( $(#[$meta])* pub $field: tree_config!(@ty $kind), )+
        }

        impl Default for TreeConfig {
            fn default() -> Self {
                Self { $( $field: $default, )+ }
            }
        }

        /// Address of a single [`TreeConfig`] field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum ConfigField {
            $( $variant, )+
        }

        impl ConfigField {
            /// Every field, in declaration order.
            pub const ALL: &'static [ConfigField] = &[ $( ConfigField::$variant, )+ ];

            pub fn name(self) -> &'static str {
                match self {
                    $( ConfigField::$variant => stringify!($field), )+
                }
            }

            pub fn kind(self) -> ValueKind {
                match self {
                    $( ConfigField::$variant => ValueKind::$kind, )+
                }
            }
        }

        impl TreeConfig {
            /// Read a field as a [`ConfigValue`].
            pub fn get(&self, field: ConfigField) -> ConfigValue {
                match field {
                    $( ConfigField::$variant => ConfigValue::$kind(self.$field.clone()), )+
                }
            }

            /// Overwrite a field. The value kind must match the field kind.
            pub fn set(
                &mut self,
                field: ConfigField,
                value: ConfigValue,
            ) -> Result<(), ConfigError> {
                match (field, value) {
                    $(
                        (ConfigField::$variant, ConfigValue::$kind(v)) => {
                            self.$field = v;
                            Ok(())
                        }
                    )+
                    (field, value) => Err(ConfigError::TypeMismatch {
                        field: field.name(),
                        expected: field.kind(),
                        found: value.kind(),
                    }),
                }
            }
        }
    };
}

tree_config! {
    // Roots
    /// Number of root growth iterations; zero disables roots.
    RootsIteration => roots_iteration: Int = 1,
    RootsStayUnderGround => roots_stay_under_ground: Bool = true,
    RootsLength => roots_length: Float = 4.0,
    RootsSplitProba => roots_split_proba: Float = 0.2,
    RootsGroundHeight => roots_ground_height: Float = -0.3,
    RootsRadius => roots_radius: Float = 0.5,

    // Trunk
    PreserveTrunk => preserve_trunk: Bool = true,
    FinishTrunk => finish_trunk: Bool = false,
    UseGreasePencil => use_grease_pencil: Bool = false,
    /// Trunk iterations before branching starts.
    TrunkLength => trunk_length: Int = 6,
    PreserveEnd => preserve_end: Int = 20,
    Radius => radius: Float = 1.0,
    /// Length of one trunk segment.
    TrunkSpace => trunk_space: Float = 0.1,
    TrunkSplitProba => trunk_split_proba: Float = 0.2,
    TrunkSplitAngle => trunk_split_angle: Float = 0.2,
    TrunkVariation => trunk_variation: Float = 0.1,
    TrunkRadiusDec => trunk_radius_dec: Float = 0.1,

    // Branches
    Iteration => iteration: Int = 25,
    BranchLength => branch_length: Float = 0.7,
    Randomangle => randomangle: Float = 0.5,
    SplitProba => split_proba: Float = 0.2,
    SplitAngle => split_angle: Float = 0.4,
    BreakChance => break_chance: Float = 0.02,
    RadiusDec => radius_dec: Float = 0.85,
    BranchMinRadius => branch_min_radius: Float = 0.02,
    /// Degrees, in `[0, 360]`.
    BranchRotate => branch_rotate: Float = 137.5,
    /// Degrees, in `[0, 360]`.
    BranchRandomRotate => branch_random_rotate: Float = 30.0,

    // Output
    Seed => seed: Int = 42,
    Uv => uv: Bool = true,
    CreateMaterial => create_material: Bool = false,
    /// Name of an existing material; not validated here.
    BarkMaterial => bark_material: Text = String::new(),

    // Twig
    TwigSeed => twig_seed: Int = 42,
    LeafSize => leaf_size: Float = 1.0,
    LeafObject => leaf_object: Text = String::new(),
    LeafWeight => leaf_weight: Float = 0.2,
    LeafChance => leaf_chance: Float = 0.5,
    TwigIteration => twig_iteration: Int = 9,
    TwigBarkMaterial => twig_bark_material: Text = String::new(),

    // Forces
    UseForceField => use_force_field: Bool = false,
    GravityStrength => gravity_strength: Float = 0.0,
    FieldsPointStrength => fields_point_strength: Float = 0.0,
    FieldsWindStrength => fields_wind_strength: Float = 0.0,
    FieldsStrengthLimit => fields_strength_limit: Float = 1.0,

    // Vertex groups / paint
    CreateLeafVertexGroup => create_leaf_vertex_group: Bool = true,
    CreateVertexPaint => create_vertex_paint: Bool = true,
    LeafsIterationLength => leafs_iteration_length: Int = 5,

    // Obstacle
    /// Name of the obstacle object; not validated here.
    Obstacle => obstacle: Text = String::new(),
    /// `"AVOID"` or `"CUT"`.
    ObstacleMode => obstacle_mode: Text = String::from("AVOID"),
    ObstacleFlipNormals => obstacle_flip_normals: Bool = false,
    ObstacleStrength => obstacle_strength: Float = 1.0,

    // Particles
    Particle => particle: Bool = false,
    Number => number: Int = 1000,
    /// Particle count shown in the viewport.
    Display => display: Int = 500,
    TwigParticle => twig_particle: Text = String::new(),
    ParticleSize => particle_size: Float = 1.0,

    // Pruning
    Pruning => pruning: Bool = false,
    PruningIntensity => pruning_intensity: Float = 0.0,
    PruningVoxelSize => pruning_voxel_size: Int = 1,

    // Armature
    CreateArmature => create_armature: Bool = false,
    BonesIterations => bones_iterations: Int = 5,

    // Session
    /// Graph-driven editing toggle. When off, graph walks are no-ops.
    UseNodeWorkflow => use_node_workflow: Bool = true,
    /// Name of the graph that drives this record.
    NodeTree => node_tree: Text = String::from("ModularTree"),
}

impl TreeConfig {
    /// Apply every write in `batch` in order.
    ///
    /// Writes with a mismatched value kind are skipped and returned; the rest
    /// of the batch still lands.
    pub fn apply_batch(&mut self, batch: &ConfigBatch) -> Vec<ConfigError> {
        let mut rejected = Vec::new();
        for op in batch.iter() {
            if let Err(err) = self.set(op.field, op.value.clone()) {
                rejected.push(err);
            }
        }
        rejected
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| ConfigError::UnknownField(s.to_string()))
    }
}
