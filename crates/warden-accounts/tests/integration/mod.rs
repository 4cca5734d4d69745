mod accounts;
mod lifecycle;
