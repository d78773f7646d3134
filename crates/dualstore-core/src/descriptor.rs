//! Static call descriptors for the repository contract
//!
//! Each operation has exactly one descriptor. A descriptor gives the
//! operation's shape class, which selects decoration, and the slot that
//! carries its routing override. Positions index the operation's argument
//! list as declared on [`Repository`](crate::contract::Repository),
//! excluding the receiver.

use std::fmt;

/// Result cardinality of an operation, used to select decoration behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    /// One-entity fetches
    Single,
    /// Collection fetches
    Multiple,
    /// Writes sent through a decorated adapter
    BulkWrite,
    /// No decoration applies
    None,
}

impl ShapeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeClass::Single => "single",
            ShapeClass::Multiple => "multiple",
            ShapeClass::BulkWrite => "bulk-write",
            ShapeClass::None => "none",
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an operation's routing override lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSlot {
    /// The `useOnlineStore` key of the options mapping at `position`
    OptionsKey {
        position: usize,
        /// Delete the key before forwarding; the mapping doubles as query parameters
        strip: bool,
        /// Merge `bypass: true` into the remote options when offline support is off
        inject_bypass: bool,
    },
    /// A trailing boolean argument at this position
    Positional(usize),
    /// Routed by global connectivity alone
    NotApplicable,
}

impl OverrideSlot {
    pub fn position(&self) -> Option<usize> {
        match self {
            OverrideSlot::OptionsKey { position, .. } | OverrideSlot::Positional(position) => {
                Some(*position)
            }
            OverrideSlot::NotApplicable => None,
        }
    }
}

/// Every operation of the repository contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindAll,
    FindRecord,
    ReloadRecord,
    Query,
    QueryRecord,
    CreateRecord,
    DeleteRecord,
    GetReference,
    HasRecordForId,
    Normalize,
    PeekAll,
    PeekRecord,
    Push,
    PushPayload,
    RecordIsLoaded,
    UnloadAll,
    UnloadRecord,
    AdapterFor,
    SerializerFor,
}

impl Operation {
    pub const ALL: [Operation; 19] = [
        Operation::FindAll,
        Operation::FindRecord,
        Operation::ReloadRecord,
        Operation::Query,
        Operation::QueryRecord,
        Operation::CreateRecord,
        Operation::DeleteRecord,
        Operation::GetReference,
        Operation::HasRecordForId,
        Operation::Normalize,
        Operation::PeekAll,
        Operation::PeekRecord,
        Operation::Push,
        Operation::PushPayload,
        Operation::RecordIsLoaded,
        Operation::UnloadAll,
        Operation::UnloadRecord,
        Operation::AdapterFor,
        Operation::SerializerFor,
    ];

    /// The descriptor for this operation
    pub fn descriptor(self) -> &'static CallDescriptor {
        &CALL_DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Routing and decoration facts for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallDescriptor {
    pub operation: Operation,
    pub name: &'static str,
    pub shape: ShapeClass,
    pub slot: OverrideSlot,
}

const fn descriptor(
    operation: Operation,
    name: &'static str,
    shape: ShapeClass,
    slot: OverrideSlot,
) -> CallDescriptor {
    CallDescriptor {
        operation,
        name,
        shape,
        slot,
    }
}

/// Options of find operations are forwarded as-is
const fn find_options(position: usize) -> OverrideSlot {
    OverrideSlot::OptionsKey {
        position,
        strip: false,
        inject_bypass: true,
    }
}

/// Query mappings become query parameters, so the override key is removed
const fn query_options(position: usize) -> OverrideSlot {
    OverrideSlot::OptionsKey {
        position,
        strip: true,
        inject_bypass: false,
    }
}

/// Indexed by `Operation as usize`
#[rustfmt::skip]
pub static CALL_DESCRIPTORS: [CallDescriptor; 19] = [
    descriptor(Operation::FindAll, "find_all", ShapeClass::Multiple, find_options(1)),
    descriptor(Operation::FindRecord, "find_record", ShapeClass::Single, find_options(2)),
    descriptor(Operation::ReloadRecord, "reload_record", ShapeClass::Single, OverrideSlot::NotApplicable),
    descriptor(Operation::Query, "query", ShapeClass::Multiple, query_options(1)),
    descriptor(Operation::QueryRecord, "query_record", ShapeClass::Single, query_options(1)),
    descriptor(Operation::CreateRecord, "create_record", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::DeleteRecord, "delete_record", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::GetReference, "get_reference", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::HasRecordForId, "has_record_for_id", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::Normalize, "normalize", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::PeekAll, "peek_all", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::PeekRecord, "peek_record", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::Push, "push", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::PushPayload, "push_payload", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::RecordIsLoaded, "record_is_loaded", ShapeClass::None, OverrideSlot::Positional(2)),
    descriptor(Operation::UnloadAll, "unload_all", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::UnloadRecord, "unload_record", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::AdapterFor, "adapter_for", ShapeClass::None, OverrideSlot::Positional(1)),
    descriptor(Operation::SerializerFor, "serializer_for", ShapeClass::None, OverrideSlot::Positional(1)),
];
