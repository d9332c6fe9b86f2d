//! Keeping an external route table in line with the ranges a peer owns.

use super::delta::RoutePlan;
use super::RangeMonitor;
use crate::models::{Cidr, Range};
use std::fmt;
use thiserror::Error;

/// An external routing API, e.g. a cloud VPC route table, holding one entry
/// per CIDR block routed to this peer.
pub trait RouteTable {
    type Error: fmt::Display;

    fn create_route(&mut self, cidr: Cidr) -> Result<(), Self::Error>;

    fn delete_route(&mut self, cidr: Cidr) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOp {
    Create,
    Delete,
}

impl fmt::Display for RouteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOp::Create => write!(f, "create"),
            RouteOp::Delete => write!(f, "delete"),
        }
    }
}

/// A single route update that the table rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to {op} route {cidr}: {reason}")]
pub struct RouteFailure {
    pub op: RouteOp,
    pub cidr: Cidr,
    pub reason: String,
}

/// Outcome of applying one update to a route table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub created: Vec<Cidr>,
    pub deleted: Vec<Cidr>,
    pub failed: Vec<RouteFailure>,
}

impl UpdateReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies range changes to a [`RouteTable`]: new routes first, then
/// deletions. Failed updates are logged and reported. Nothing is retried or
/// rolled back.
pub struct RouteTableMonitor<T> {
    name: String,
    table: T,
}

impl<T: RouteTable> RouteTableMonitor<T> {
    pub fn new(name: impl Into<String>, table: T) -> Self {
        let name = name.into();
        log::info!("{name}: route table monitor initialized");
        RouteTableMonitor { name, table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn into_inner(self) -> T {
        self.table
    }

    fn apply(&mut self, op: RouteOp, cidr: Cidr, report: &mut UpdateReport) {
        let result = match op {
            RouteOp::Create => {
                log::info!("{}: creating {cidr} route", self.name);
                self.table.create_route(cidr)
            }
            RouteOp::Delete => {
                log::info!("{}: removing {cidr} route", self.name);
                self.table.delete_route(cidr)
            }
        };
        match result {
            Ok(()) => match op {
                RouteOp::Create => report.created.push(cidr),
                RouteOp::Delete => report.deleted.push(cidr),
            },
            Err(e) => {
                let failure = RouteFailure {
                    op,
                    cidr,
                    reason: e.to_string(),
                };
                log::error!("{}: {failure}", self.name);
                report.failed.push(failure);
            }
        }
    }
}

impl<T: RouteTable> RangeMonitor for RouteTableMonitor<T> {
    fn handle_update(&mut self, old: &[Range], new: &[Range]) -> UpdateReport {
        let plan = RoutePlan::between(old, new);
        let mut report = UpdateReport::default();
        for cidr in plan.create {
            self.apply(RouteOp::Create, cidr, &mut report);
        }
        for cidr in plan.delete {
            self.apply(RouteOp::Delete, cidr, &mut report);
        }
        if !report.is_success() {
            log::warn!(
                "{}: {} of {} route update(s) failed",
                self.name,
                report.failed.len(),
                report.failed.len() + report.created.len() + report.deleted.len()
            );
        }
        report
    }
}
