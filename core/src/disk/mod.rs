// Block devices and the partitions described for them

pub mod device;
pub mod partition;

pub use device::{BlockDevice, DeviceClass};
pub use partition::{EnvPartition, PartName, PartitionDef};
