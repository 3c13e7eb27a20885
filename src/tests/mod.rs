pub mod ledger_tests;
