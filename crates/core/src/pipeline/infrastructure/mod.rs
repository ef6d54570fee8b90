pub mod edit_worker;
