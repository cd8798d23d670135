//! Static meter tables.

use meterbind_core::{BindError, TimeUnit};
use meterbind_engine::BindingContext;

/// How an attribute is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterDefKind {
    Gauge,
    /// Time gauge whose attribute is expressed in the given unit.
    TimeGauge(TimeUnit),
    FunctionCounter,
}

/// One attribute-to-meter binding. `name` is appended to the catalog prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterDef {
    pub attribute: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: MeterDefKind,
}

pub const fn gauge(
    attribute: &'static str,
    name: &'static str,
    description: &'static str,
) -> MeterDef {
    MeterDef {
        attribute,
        name,
        description,
        kind: MeterDefKind::Gauge,
    }
}

pub const fn time_gauge(
    attribute: &'static str,
    name: &'static str,
    description: &'static str,
    unit: TimeUnit,
) -> MeterDef {
    MeterDef {
        attribute,
        name,
        description,
        kind: MeterDefKind::TimeGauge(unit),
    }
}

pub const fn counter(
    attribute: &'static str,
    name: &'static str,
    description: &'static str,
) -> MeterDef {
    MeterDef {
        attribute,
        name,
        description,
        kind: MeterDefKind::FunctionCounter,
    }
}

impl MeterDef {
    /// Bind this definition on `ctx` under `prefix + name`.
    pub fn bind(&self, ctx: &BindingContext, prefix: &str) -> Result<(), BindError> {
        let meter_name = format!("{prefix}{}", self.name);
        match self.kind {
            MeterDefKind::Gauge => ctx.bind_gauge(self.attribute, &meter_name, self.description),
            MeterDefKind::TimeGauge(unit) => {
                ctx.bind_time_gauge(self.attribute, &meter_name, self.description, unit)
            }
            MeterDefKind::FunctionCounter => {
                ctx.bind_function_counter(self.attribute, &meter_name, self.description)
            }
        }
    }
}

/// Bind every definition of every table, stopping at the first error.
pub fn bind_tables(
    ctx: &BindingContext,
    prefix: &str,
    tables: &[&[MeterDef]],
) -> Result<(), BindError> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .try_for_each(|def| def.bind(ctx, prefix))
}
