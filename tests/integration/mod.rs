mod persistence;
mod purchase_flow;
mod repricing;
