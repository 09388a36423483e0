//! Graph nodes: type tags, per-type fields and socket layouts.

use serde::{Deserialize, Serialize};

use mtree_config_core::TreeConfig;

use crate::socket::Socket;
use crate::types::NodeId;

mod fields;
pub mod layout;

pub use fields::{
    ArmatureFields, BranchFields, CurveDriver, CurveFields, ForcesFields, NodeFields, NodeKind,
    ObstacleFields, ObstacleMode, OutputFields, ParticleFields, PruningFields, RootFields,
    TrunkFields, TwigFields, VertexFields,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Root,
    Trunk,
    Branch,
    Output,
    Twig,
    Forces,
    Vertex,
    Obstacle,
    Particle,
    Pruning,
    Armature,
    Curve,
}

/// Add-menu grouping of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Tree,
    Input,
    Output,
    Modifiers,
}

impl NodeType {
    pub const ALL: &'static [NodeType] = &[
        NodeType::Root,
        NodeType::Trunk,
        NodeType::Branch,
        NodeType::Output,
        NodeType::Twig,
        NodeType::Forces,
        NodeType::Vertex,
        NodeType::Obstacle,
        NodeType::Particle,
        NodeType::Pruning,
        NodeType::Armature,
        NodeType::Curve,
    ];

    /// Display label, also the base of generated node names.
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Root => "Roots",
            NodeType::Trunk => "Trunk",
            NodeType::Branch => "Branches",
            NodeType::Output => "Tree_Output",
            NodeType::Twig => "Twig",
            NodeType::Forces => "Forces",
            NodeType::Vertex => "Vertex",
            NodeType::Obstacle => "Obstacle",
            NodeType::Particle => "Particles",
            NodeType::Pruning => "Pruning",
            NodeType::Armature => "Armature",
            NodeType::Curve => "Curve_Mapping",
        }
    }

    pub fn category(self) -> NodeCategory {
        match self {
            NodeType::Root | NodeType::Trunk | NodeType::Branch => NodeCategory::Tree,
            NodeType::Curve => NodeCategory::Input,
            NodeType::Output | NodeType::Twig => NodeCategory::Output,
            NodeType::Forces
            | NodeType::Vertex
            | NodeType::Obstacle
            | NodeType::Particle
            | NodeType::Pruning
            | NodeType::Armature => NodeCategory::Modifiers,
        }
    }

    /// Whether graph walks should synchronize nodes of this type.
    pub fn declares_update(self) -> bool {
        !matches!(self, NodeType::Curve)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: String,
    pub position: [f32; 2],
    kind: NodeKind,
    inputs: Vec<Socket>,
    outputs: Vec<Socket>,
}

impl Node {
    /// Create a node with its fixed socket layout, seeding input defaults from
    /// `cfg`.
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        kind: NodeKind,
        position: [f32; 2],
        cfg: &TreeConfig,
    ) -> Self {
        let (inputs, outputs) = layout::sockets_for(kind.node_type(), cfg);
        Node {
            id,
            name: name.into(),
            position,
            kind,
            inputs,
            outputs,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Typed fields, `None` when `T` is not this node's variant.
    pub fn fields<T: NodeFields>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Mutable typed fields. The node's variant itself can never be replaced.
    pub fn fields_mut<T: NodeFields>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    pub fn inputs(&self) -> &[Socket] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Socket] {
        &self.outputs
    }

    pub fn input(&self, name: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.name() == name)
    }

    pub fn input_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.name() == name)
    }

    pub fn output(&self, name: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.name() == name)
    }

    pub fn output_mut(&mut self, name: &str) -> Option<&mut Socket> {
        self.outputs.iter_mut().find(|s| s.name() == name)
    }

    /// Default value of a value-carrying input.
    pub fn input_value(&self, name: &str) -> Option<f32> {
        self.input(name).and_then(Socket::value)
    }

    /// Write an input's default value (clamped). Returns `false` if there is
    /// no such value-carrying input.
    pub fn set_input_value(&mut self, name: &str, value: f32) -> bool {
        match self.input_mut(name) {
            Some(socket) if socket.kind().carries_value() => {
                socket.set_value(value);
                true
            }
            _ => false,
        }
    }

    /// Append an extra input. Rejected if the name is already taken. Graph
    /// callers go through [`Graph::add_input`](crate::Graph::add_input).
    pub(crate) fn add_input(&mut self, socket: Socket) -> bool {
        if self.input(socket.name()).is_some() {
            return false;
        }
        self.inputs.push(socket);
        true
    }

    /// Detach an input without touching links; see
    /// [`Graph::remove_input`](crate::Graph::remove_input).
    pub(crate) fn remove_input(&mut self, name: &str) -> Option<Socket> {
        let index = self.inputs.iter().position(|s| s.name() == name)?;
        Some(self.inputs.remove(index))
    }
}
