//! Schema tree traversal.
//!
//! A sport layout is a statically shaped tree of groups, arrays, and
//! [`Field`]/[`BooleanField`] leaves. Applying a packet walks the whole tree
//! and lets every leaf decide for itself whether the packet's window covers
//! it; leaves never observe each other's results.
//!
//! The composite is resolved at construction time through the [`SchemaNode`]
//! trait; there is no runtime type inspection. Group structs get their impl
//! from the [`schema_group!`] macro.

use crate::boolean_field::BooleanField;
use crate::field::Field;
use crate::packet::Packet;

/// Anything that can absorb a packet: a leaf field or a composite of them.
pub trait SchemaNode {
    /// Apply a packet, returning whether any contained value changed.
    fn update(&mut self, packet: &Packet) -> bool;
}

/// Apply a packet to a schema tree.
///
/// This is the mutation entry point for schema trees; nothing outside test
/// code calls a leaf's `update` directly.
pub fn apply(tree: &mut impl SchemaNode, packet: &Packet) -> bool {
    tree.update(packet)
}

impl<T: Clone> SchemaNode for Field<T> {
    fn update(&mut self, packet: &Packet) -> bool {
        Field::update(self, packet)
    }
}

impl SchemaNode for BooleanField {
    fn update(&mut self, packet: &Packet) -> bool {
        BooleanField::update(self, packet)
    }
}

impl<N: SchemaNode> SchemaNode for Option<N> {
    fn update(&mut self, packet: &Packet) -> bool {
        match self {
            Some(node) => node.update(packet),
            None => false,
        }
    }
}

impl<N: SchemaNode> SchemaNode for Vec<N> {
    fn update(&mut self, packet: &Packet) -> bool {
        let mut changed = false;
        for node in self.iter_mut() {
            changed |= node.update(packet);
        }
        changed
    }
}

impl<N: SchemaNode, const LEN: usize> SchemaNode for [N; LEN] {
    fn update(&mut self, packet: &Packet) -> bool {
        let mut changed = false;
        for node in self.iter_mut() {
            changed |= node.update(packet);
        }
        changed
    }
}

/// Implement [`SchemaNode`] for a group struct by walking the named fields.
///
/// ```rust
/// use courtside::{BooleanField, Field, schema_group};
///
/// struct Clock {
///     time: Field<String>,
///     horn: BooleanField,
/// }
///
/// schema_group!(Clock { time, horn });
/// ```
#[macro_export]
macro_rules! schema_group {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::SchemaNode for $ty {
            fn update(&mut self, packet: &$crate::Packet) -> bool {
                let mut changed = false;
                $( changed |= $crate::SchemaNode::update(&mut self.$field, packet); )+
                changed
            }
        }
    };
}
