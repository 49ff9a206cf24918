pub mod autosave;
pub mod ordering;
pub mod reconcile;
pub mod task_ops;
pub mod topic_form;
pub mod topic_ops;
