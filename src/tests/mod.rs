mod roller;
mod scan;
