pub mod plan_manager;
