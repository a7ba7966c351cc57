mod diversity;
mod graph_ports;
mod selector;
