//! Layout templates and the template database.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::rect::Rect;
use routing::{LayerId, RoutingGrid};
use tracing::{span, Level};

use crate::builder::TemplateBuilder;
use crate::cell::Layout;
use crate::error::LayoutError;

/// A parameterized layout generator.
pub trait Template {
    /// Extra data produced alongside the layout, such as schematic parameters.
    type Data;
    /// The error type of [`Template::draw_layout`].
    type Error: From<LayoutError>;

    /// The name of the generated cell.
    fn name(&self) -> ArcStr;

    /// Draws the layout.
    fn draw_layout(&self, builder: &mut TemplateBuilder) -> Result<Self::Data, Self::Error>;
}

/// A generated layout together with its extra data.
#[derive(Debug, Clone)]
pub struct Master<D> {
    layout: Arc<Layout>,
    data: D,
}

impl<D> Master<D> {
    /// The generated layout.
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// The extra data produced by the template.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// The boundary of the layout.
    pub fn bound_box(&self) -> Rect {
        self.layout.bound_box()
    }

    /// The highest routing layer used by the layout.
    pub fn top_layer(&self) -> LayerId {
        self.layout.top_layer()
    }
}

/// Generates layouts on a shared routing grid.
#[derive(Debug, Clone)]
pub struct TemplateDb {
    grid: Arc<RoutingGrid>,
}

impl TemplateDb {
    /// Creates a template database drawing on `grid`.
    pub fn new(grid: Arc<RoutingGrid>) -> Self {
        Self { grid }
    }

    /// The routing grid.
    pub fn grid(&self) -> &Arc<RoutingGrid> {
        &self.grid
    }

    /// Generates the layout of `template`.
    ///
    /// Either the complete layout is returned or nothing is.
    pub fn new_template<T: Template>(&self, template: &T) -> Result<Master<T::Data>, T::Error> {
        let name = template.name();
        let span = span!(Level::INFO, "template", name = %name);
        let _guard = span.enter();

        let mut builder = TemplateBuilder::new(self.clone(), name);
        let data = template.draw_layout(&mut builder)?;
        let layout = builder.finish()?;
        tracing::debug!(
            bbox = ?layout.bound_box(),
            num_pins = layout.pins.len(),
            "finished template"
        );
        Ok(Master {
            layout: Arc::new(layout),
            data,
        })
    }
}
