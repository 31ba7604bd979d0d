mod nontrivial_param;

pub use nontrivial_param::NontrivialParamAdvisor;
