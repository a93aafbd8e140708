use super::*;

mod add;
mod branch;
mod call;
mod inp;
mod lda;
mod logic;
mod out;
mod shift;
mod sta;
mod sub;
