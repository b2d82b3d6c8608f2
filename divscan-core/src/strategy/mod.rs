pub mod classifier;
pub mod divergence;
pub mod rule;

use divscan_model::series::PriceSeries;

use crate::model::analysis::Analysis;

pub trait SignalGenerator {
    fn name(&self) -> &str;

    fn generate_signal(&self, series: &PriceSeries) -> Analysis;
}
