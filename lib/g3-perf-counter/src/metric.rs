/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use crate::{CounterLookup, CounterRecord, PerfError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CounterKey {
    type_name: &'static str,
    property_name: &'static str,
}

impl CounterKey {
    pub const fn new(type_name: &'static str, property_name: &'static str) -> Self {
        CounterKey {
            type_name,
            property_name,
        }
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub const fn property_name(&self) -> &'static str {
        self.property_name
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.type_name, self.property_name)
    }
}

macro_rules! def_well_known {
    ($($method:ident, $key:ident, $type_name:literal, $property_name:literal;)+) => {
        impl CounterKey {
            $(
                pub const $key: CounterKey = CounterKey::new($type_name, $property_name);
            )+

            pub const WELL_KNOWN: &'static [CounterKey] = &[$(CounterKey::$key),+];
        }

        /// Lookups of the counters published by the enhanced monitoring agent.
        pub trait WellKnownCounters: CounterLookup {
            $(
                #[doc = concat!("Lookup `", $type_name, "\\", $property_name, "`.")]
                fn $method(&self) -> Result<CounterRecord, PerfError> {
                    self.lookup_key(&CounterKey::$key)
                }
            )+
        }

        impl<T: CounterLookup + ?Sized> WellKnownCounters for T {}
    };
}

def_well_known! {
    config_cloud_provider, CONFIG_CLOUD_PROVIDER, "config", "Cloud Provider";
    config_cpu_over_provisioning, CONFIG_CPU_OVER_PROVISIONING, "config", "CPU Over-Provisioning";
    config_memory_over_provisioning, CONFIG_MEMORY_OVER_PROVISIONING, "config", "Memory Over-Provisioning";
    config_data_provider_version, CONFIG_DATA_PROVIDER_VERSION, "config", "Data Provider Version";
    config_data_sources, CONFIG_DATA_SOURCES, "config", "Data Sources";
    config_instance_type, CONFIG_INSTANCE_TYPE, "config", "Instance Type";
    config_virtualization_solution, CONFIG_VIRTUALIZATION_SOLUTION, "config", "Virtualization Solution";
    config_virtualization_solution_version, CONFIG_VIRTUALIZATION_SOLUTION_VERSION, "config", "Virtualization Solution Version";
    config_last_hardware_change, CONFIG_LAST_HARDWARE_CHANGE, "config", "Last Hardware Change";

    cpu_current_hw_frequency, CPU_CURRENT_HW_FREQUENCY, "cpu", "Current Hw Frequency";
    cpu_max_hw_frequency, CPU_MAX_HW_FREQUENCY, "cpu", "Max Hw Frequency";
    cpu_current_vm_processing_power, CPU_CURRENT_VM_PROCESSING_POWER, "cpu", "Current VM Processing Power";
    cpu_guaranteed_vm_processing_power, CPU_GUARANTEED_VM_PROCESSING_POWER, "cpu", "Guaranteed VM Processing Power";
    cpu_max_vm_processing_power, CPU_MAX_VM_PROCESSING_POWER, "cpu", "Max. VM Processing Power";
    cpu_number_of_cores_per_cpu, CPU_NUMBER_OF_CORES_PER_CPU, "cpu", "Number of Cores per CPU";
    cpu_number_of_threads_per_core, CPU_NUMBER_OF_THREADS_PER_CORE, "cpu", "Number of Threads per Core";
    cpu_phys_processing_power_per_vcpu, CPU_PHYS_PROCESSING_POWER_PER_VCPU, "cpu", "Phys. Processing Power per vCPU";
    cpu_processor_type, CPU_PROCESSOR_TYPE, "cpu", "Processor Type";
    cpu_reference_compute_unit, CPU_REFERENCE_COMPUTE_UNIT, "cpu", "Reference Compute Unit";
    cpu_vcpu_mapping, CPU_VCPU_MAPPING, "cpu", "vCPU Mapping";
    cpu_vm_processing_power_consumption, CPU_VM_PROCESSING_POWER_CONSUMPTION, "cpu", "VM Processing Power Consumption";

    memory_current_memory_assigned, MEMORY_CURRENT_MEMORY_ASSIGNED, "memory", "Current Memory assigned";
    memory_guaranteed_memory_assigned, MEMORY_GUARANTEED_MEMORY_ASSIGNED, "memory", "Guaranteed Memory assigned";
    memory_max_memory_assigned, MEMORY_MAX_MEMORY_ASSIGNED, "memory", "Max Memory assigned";
    memory_vm_memory_consumption, MEMORY_VM_MEMORY_CONSUMPTION, "memory", "VM Memory Consumption";

    network_adapter_id, NETWORK_ADAPTER_ID, "network", "Adapter Id";
    network_mapping, NETWORK_MAPPING, "network", "Mapping";
    network_min_network_bandwidth, NETWORK_MIN_NETWORK_BANDWIDTH, "network", "Minimum Network Bandwidth";
    network_max_network_bandwidth, NETWORK_MAX_NETWORK_BANDWIDTH, "network", "Maximum Network Bandwidth";
    network_network_read_bytes, NETWORK_NETWORK_READ_BYTES, "network", "Network Read Bytes";
    network_network_write_bytes, NETWORK_NETWORK_WRITE_BYTES, "network", "Network Write Bytes";
    network_packets_retransmitted, NETWORK_PACKETS_RETRANSMITTED, "network", "Packets Retransmitted";

    storage_phys_disc_to_storage_mapping, STORAGE_PHYS_DISC_TO_STORAGE_MAPPING, "storage", "Phys. Disc to Storage Mapping";
    storage_storage_id, STORAGE_STORAGE_ID, "storage", "Storage ID";
    storage_read_bytes, STORAGE_READ_BYTES, "storage", "Storage Read Bytes";
    storage_read_ops, STORAGE_READ_OPS, "storage", "Storage Read Ops";
    storage_read_op_latency_e2e, STORAGE_READ_OP_LATENCY_E2E, "storage", "Storage Read Op Latency E2E msec";
    storage_read_op_latency_server, STORAGE_READ_OP_LATENCY_SERVER, "storage", "Storage Read Op Latency Server msec";
    storage_read_throughput_e2e, STORAGE_READ_THROUGHPUT_E2E, "storage", "Storage Read Throughput E2E MB/sec";
    storage_write_bytes, STORAGE_WRITE_BYTES, "storage", "Storage Write Bytes";
    storage_write_ops, STORAGE_WRITE_OPS, "storage", "Storage Write Ops";
    storage_write_op_latency_e2e, STORAGE_WRITE_OP_LATENCY_E2E, "storage", "Storage Write Op Latency E2E msec";
    storage_write_op_latency_server, STORAGE_WRITE_OP_LATENCY_SERVER, "storage", "Storage Write Op Latency Server msec";
    storage_write_throughput_e2e, STORAGE_WRITE_THROUGHPUT_E2E, "storage", "Storage Write Throughput E2E MB/sec";
}
