//! Module validation.

use std::collections::HashMap;
use std::fmt::Display;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::module::Module;

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// An error. Generation cannot continue.
    Error,
}

/// The reason a [`ValidatorIssue`] was raised.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cause {
    /// An instance terminal is connected to an empty net name.
    EmptyNet {
        /// The instance.
        inst: ArcStr,
        /// The terminal.
        terminal: ArcStr,
    },
    /// An instance does not name a cell.
    EmptyCell {
        /// The instance.
        inst: ArcStr,
    },
    /// A pin is not connected to any instance.
    UnconnectedPin {
        /// The pin.
        pin: ArcStr,
    },
    /// An internal net is connected to only one terminal.
    FloatingNet {
        /// The net.
        net: ArcStr,
    },
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNet { inst, terminal } => write!(
                f,
                "empty net: terminal `{}` of instance `{}` is connected to an empty net name",
                terminal, inst
            ),
            Self::EmptyCell { inst } => {
                write!(f, "empty cell: instance `{}` does not name a cell", inst)
            }
            Self::UnconnectedPin { pin } => {
                write!(f, "unconnected pin: pin `{}` is not connected to any instance", pin)
            }
            Self::FloatingNet { net } => write!(
                f,
                "floating net: net `{}` is connected to only one instance terminal",
                net
            ),
        }
    }
}

/// An issue identified during validation of a [`Module`].
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidatorIssue {
    cause: Cause,
    severity: Severity,
}

impl ValidatorIssue {
    /// Creates a new validator issue and logs it immediately.
    ///
    /// The log level is selected according to the given severity.
    fn new_and_log(cause: Cause, severity: Severity) -> Self {
        let result = Self { cause, severity };
        match severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?result.cause, "{}", result),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?result.cause, "{}", result),
            Severity::Error => tracing::event!(Level::ERROR, issue = ?result.cause, "{}", result),
        }
        result
    }

    /// The underlying cause of this issue.
    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The severity of this issue.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl Display for ValidatorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cause)
    }
}

/// A collection of validation issues.
#[derive(Debug, Clone, Default)]
pub struct IssueSet {
    issues: Vec<ValidatorIssue>,
    num_errors: usize,
    num_warnings: usize,
}

impl IssueSet {
    fn add(&mut self, issue: ValidatorIssue) {
        match issue.severity {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Info => (),
        }
        self.issues.push(issue);
    }

    /// Iterates over all issues.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorIssue> {
        self.issues.iter()
    }

    /// The number of issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if there are no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns `true` if any issue is an error.
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    /// The number of errors.
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// The number of warnings.
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl Module {
    /// Checks the module for connectivity problems.
    ///
    /// Every issue found is also emitted as a `tracing` event.
    pub fn validate(&self) -> IssueSet {
        let mut issues = IssueSet::default();
        let mut net_uses: HashMap<&str, usize> = HashMap::new();

        for inst in self.instances() {
            if inst.cell().is_empty() {
                issues.add(ValidatorIssue::new_and_log(
                    Cause::EmptyCell {
                        inst: inst.name().clone(),
                    },
                    Severity::Error,
                ));
            }
            for (terminal, net) in inst.connections() {
                if net.is_empty() {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::EmptyNet {
                            inst: inst.name().clone(),
                            terminal: terminal.clone(),
                        },
                        Severity::Error,
                    ));
                } else {
                    *net_uses.entry(net.as_str()).or_default() += 1;
                }
            }
        }

        for pin in self.pins() {
            if !net_uses.contains_key(pin.name.as_str()) {
                issues.add(ValidatorIssue::new_and_log(
                    Cause::UnconnectedPin {
                        pin: pin.name.clone(),
                    },
                    Severity::Warning,
                ));
            }
        }

        let mut floating: Vec<&str> = net_uses
            .iter()
            .filter(|(net, uses)| **uses == 1 && self.pin(net).is_none())
            .map(|(net, _)| *net)
            .collect();
        floating.sort_unstable();
        for net in floating {
            issues.add(ValidatorIssue::new_and_log(
                Cause::FloatingNet {
                    net: ArcStr::from(net),
                },
                Severity::Warning,
            ));
        }

        issues
    }
}
