keymap_conformance::kernel_suite!(hash_map, keymap::HashMap<String, String>);
keymap_conformance::kernel_suite!(tree_map, keymap::TreeMap<String, String>);
keymap_conformance::kernel_suite!(reference, keymap_conformance::Reference<String, String>);
