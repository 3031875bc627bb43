pub mod xconnection;
