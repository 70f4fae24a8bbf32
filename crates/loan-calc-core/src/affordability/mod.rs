pub mod max_loan;
