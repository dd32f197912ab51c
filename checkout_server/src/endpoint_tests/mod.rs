mod checkout;
mod helpers;
mod mocks;
mod notify;
mod orders;
