pub mod city;
pub mod ui;
