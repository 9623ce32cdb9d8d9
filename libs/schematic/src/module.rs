//! Schematic modules and their editing operations.

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{span, Level};

use crate::error::{Result, SchematicError};
use crate::instance::{Instance, ParamValue};

/// The direction of a module pin.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    /// An input.
    Input,
    /// An output.
    Output,
    /// A bidirectional pin, such as a supply.
    InOut,
}

/// A module pin.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    /// The pin name, which is also the name of the net it connects to.
    pub name: ArcStr,
    /// The pin direction.
    pub direction: PinDirection,
}

#[derive(Deserialize)]
struct ModuleTemplate {
    name: ArcStr,
    #[serde(default)]
    pins: Vec<Pin>,
    #[serde(default)]
    instances: Vec<Instance>,
}

/// A schematic module: an ordered list of pins and instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    name: ArcStr,
    pins: IndexMap<ArcStr, Pin>,
    instances: IndexMap<ArcStr, Instance>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            pins: IndexMap::new(),
            instances: IndexMap::new(),
        }
    }

    /// Parses a module from a TOML netlist template.
    ///
    /// # Example
    ///
    /// ```
    /// # use schematic::Module;
    /// let module = Module::from_template(r#"
    /// name = "divider"
    ///
    /// [[pins]]
    /// name = "out"
    /// direction = "output"
    ///
    /// [[instances]]
    /// name = "XR0"
    /// cell = "res"
    /// connections = { PLUS = "out", MINUS = "gnd" }
    /// params = { r = 1000 }
    /// "#).unwrap();
    /// assert_eq!(module.instance("XR0").unwrap().connection("PLUS").unwrap(), "out");
    /// ```
    pub fn from_template(src: &str) -> Result<Self> {
        let template: ModuleTemplate = toml::from_str(src)?;
        let mut module = Self::new(template.name);
        for pin in template.pins {
            module.add_pin(pin.name, pin.direction)?;
        }
        for inst in template.instances {
            module.add_instance(inst)?;
        }
        Ok(module)
    }

    /// The module name.
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The pins of the module, in order.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// Gets a pin by name.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.get(name)
    }

    /// The instances of the module, in order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    fn missing_pin(&self, pin: &str) -> SchematicError {
        SchematicError::MissingPin {
            module: self.name.clone(),
            pin: ArcStr::from(pin),
        }
    }

    fn missing_instance(&self, inst: &str) -> SchematicError {
        SchematicError::MissingInstance {
            module: self.name.clone(),
            inst: ArcStr::from(inst),
        }
    }

    /// Adds a pin.
    pub fn add_pin(&mut self, name: impl Into<ArcStr>, direction: PinDirection) -> Result<()> {
        let name = name.into();
        if self.pins.contains_key(&name) {
            return Err(SchematicError::DuplicatePin {
                module: self.name.clone(),
                pin: name,
            });
        }
        self.pins.insert(name.clone(), Pin { name, direction });
        Ok(())
    }

    /// Renames pin `old` to `new`, along with every connection to net `old`.
    pub fn rename_pin(&mut self, old: &str, new: impl Into<ArcStr>) -> Result<()> {
        let new = new.into();
        if old == new.as_str() {
            return self.pin(old).map(|_| ()).ok_or_else(|| self.missing_pin(old));
        }
        if self.pins.contains_key(&new) {
            return Err(SchematicError::DuplicatePin {
                module: self.name.clone(),
                pin: new,
            });
        }
        let idx = self
            .pins
            .get_index_of(old)
            .ok_or_else(|| self.missing_pin(old))?;
        let (_, mut pin) = self
            .pins
            .shift_remove_index(idx)
            .ok_or_else(|| self.missing_pin(old))?;
        pin.name = new.clone();
        self.pins.shift_insert(idx, new.clone(), pin);

        for inst in self.instances.values_mut() {
            for net in inst.connections_mut().values_mut() {
                if net.as_str() == old {
                    *net = new.clone();
                }
            }
        }
        tracing::debug!(module = %self.name, %old, %new, "renamed pin");
        Ok(())
    }

    /// Removes a pin. Connections to its net are left untouched.
    pub fn remove_pin(&mut self, name: &str) -> Result<Pin> {
        self.pins
            .shift_remove(name)
            .ok_or_else(|| self.missing_pin(name))
    }

    /// Adds an instance.
    pub fn add_instance(&mut self, inst: Instance) -> Result<()> {
        if self.instances.contains_key(inst.name()) {
            return Err(SchematicError::DuplicateInstance {
                module: self.name.clone(),
                inst: inst.name().clone(),
            });
        }
        self.instances.insert(inst.name().clone(), inst);
        Ok(())
    }

    /// Removes an instance.
    pub fn remove_instance(&mut self, name: &str) -> Result<Instance> {
        let inst = self
            .instances
            .shift_remove(name)
            .ok_or_else(|| self.missing_instance(name))?;
        tracing::debug!(module = %self.name, inst = %name, "removed instance");
        Ok(inst)
    }

    /// Gets an instance by name.
    pub fn instance(&self, name: &str) -> Result<&Instance> {
        self.instances
            .get(name)
            .ok_or_else(|| self.missing_instance(name))
    }

    /// Gets a mutable reference to an instance by name.
    pub fn instance_mut(&mut self, name: &str) -> Result<&mut Instance> {
        let err = self.missing_instance(name);
        self.instances.get_mut(name).ok_or(err)
    }

    /// Replaces instance `name` by one copy per entry of `new_names`, in its place.
    ///
    /// The copies keep the original connections and parameters. An empty list removes
    /// the instance.
    pub fn array_instance<S: AsRef<str>>(&mut self, name: &str, new_names: &[S]) -> Result<()> {
        let idx = self
            .instances
            .get_index_of(name)
            .ok_or_else(|| self.missing_instance(name))?;
        for new_name in new_names {
            let new_name = new_name.as_ref();
            if new_name != name && self.instances.contains_key(new_name) {
                return Err(SchematicError::DuplicateInstance {
                    module: self.name.clone(),
                    inst: ArcStr::from(new_name),
                });
            }
        }
        let (_, inst) = self
            .instances
            .shift_remove_index(idx)
            .ok_or_else(|| self.missing_instance(name))?;
        for (offset, new_name) in new_names.iter().enumerate() {
            let mut copy = inst.clone();
            copy.set_name(ArcStr::from(new_name.as_ref()));
            self.instances
                .shift_insert(idx + offset, copy.name().clone(), copy);
        }
        Ok(())
    }

    /// Reconnects terminals of instance `name`.
    ///
    /// Every terminal must already exist on the instance.
    pub fn reconnect_instance<K, V>(
        &mut self,
        name: &str,
        conns: impl IntoIterator<Item = (K, V)>,
    ) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<ArcStr>,
    {
        let inst = self.instance_mut(name)?;
        for (terminal, net) in conns {
            inst.reconnect(terminal.as_ref(), net)?;
        }
        Ok(())
    }

    /// Reconnects a single terminal of instance `name`.
    pub fn reconnect_instance_terminal(
        &mut self,
        name: &str,
        terminal: &str,
        net: impl Into<ArcStr>,
    ) -> Result<()> {
        self.instance_mut(name)?.reconnect(terminal, net)
    }

    /// Expands instance `name` into `nser * npar` unit resistors.
    ///
    /// Each of the `npar` parallel branches chains `nser` units from `plus` to `minus`
    /// through intermediate nets `mid<i>`. Branches share their intermediate nets when
    /// `connect_mid` is set. Units are named `name<k>`, or keep the name `name` when
    /// there is only one. Every unit gets `unit_params` and its `BULK` terminal
    /// connected to `bulk`.
    #[allow(clippy::too_many_arguments)]
    pub fn design_resistor(
        &mut self,
        name: &str,
        unit_params: &IndexMap<ArcStr, ParamValue>,
        nser: usize,
        npar: usize,
        plus: &str,
        minus: &str,
        mid: &str,
        bulk: &str,
        connect_mid: bool,
    ) -> Result<()> {
        if nser == 0 || npar == 0 {
            return Err(SchematicError::InvalidResistorCount {
                inst: ArcStr::from(name),
                nser,
                npar,
            });
        }
        let span = span!(Level::DEBUG, "design_resistor", inst = %name, nser, npar);
        let _guard = span.enter();

        {
            let inst = self.instance_mut(name)?;
            inst.design(unit_params.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let ntot = nser * npar;
        if ntot == 1 {
            return self.reconnect_instance(name, [("PLUS", plus), ("MINUS", minus), ("BULK", bulk)]);
        }

        let mid_net = |branch: usize, idx: usize| -> ArcStr {
            if connect_mid || npar == 1 {
                arcstr::format!("{mid}<{idx}>")
            } else {
                arcstr::format!("{mid}<{}>", branch * (nser - 1) + idx)
            }
        };
        let names: Vec<ArcStr> = (0..ntot).map(|k| arcstr::format!("{name}<{k}>")).collect();
        self.array_instance(name, &names)?;
        for branch in 0..npar {
            for s in 0..nser {
                let plus_net = if s == 0 {
                    ArcStr::from(plus)
                } else {
                    mid_net(branch, s - 1)
                };
                let minus_net = if s + 1 == nser {
                    ArcStr::from(minus)
                } else {
                    mid_net(branch, s)
                };
                self.reconnect_instance(
                    &names[branch * nser + s],
                    [
                        ("PLUS", plus_net),
                        ("MINUS", minus_net),
                        ("BULK", ArcStr::from(bulk)),
                    ],
                )?;
            }
        }
        Ok(())
    }
}
