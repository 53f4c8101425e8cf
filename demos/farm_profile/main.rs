//! Farm profile demo
//!
//! Shows a small farm: two corn fields, a wheat field and a fallow plot.
//! Move the mouse to orbit, Escape to quit.
//!
//! `FARM_TWIN_VSYNC=0` disables vsync, `FARM_TWIN_LOG=debug` shows build and
//! teardown logs.

use farm_twin::prelude::*;

fn main() -> anyhow::Result<()> {
    let fields = vec![
        FieldDescriptor::numbered(0).with_crop("Sweet Corn"),
        FieldDescriptor::new("Back forty", 14.0, 8.0)
            .with_crop("Winter Wheat")
            .with_soil_type("silt loam"),
        FieldDescriptor::new("Creek bottom", 6.0, 9.0).with_crop("Maize"),
        FieldDescriptor::numbered(3).with_soil_type("clay"),
    ];

    FarmTwinApp::new(ViewerConfig::from_env().with_title("Farm Profile"))
        .with_fields(fields)
        .run()?;
    Ok(())
}
