pub mod comparison;
pub mod dashboard;
pub mod drilldown;
pub mod kpi;
pub mod risk;
