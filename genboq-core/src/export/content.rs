pub const SCOPE_OF_WORK: &[&str] = &[
    "Supply of all equipment as specified in the Bill of Quantities.",
    "Installation and commissioning of the supplied AV equipment.",
    "Integration of all system components to ensure seamless operation.",
    "Basic user training upon project completion.",
];

pub const EXCLUSIONS: &[&str] = &[
    "Any civil, masonry, or electrical works. This includes conduit laying, core cutting, and providing power outlets.",
    "Network infrastructure, including cabling, switches, and internet connectivity, which is assumed to be provided by the client.",
    "Furniture, fixtures, and any items not explicitly mentioned in the Bill of Quantities.",
    "Annual Maintenance Contract (AMC), which can be quoted separately upon request.",
];

pub const TERMS_AND_CONDITIONS: &[&str] = &[
    "Prices are estimates and subject to change based on final equipment selection and market fluctuations. All prices are exclusive of applicable taxes.",
    "Payment Terms: 50% advance with purchase order, 40% on material delivery, 10% on project completion and handover.",
    "Validity: This quotation is valid for 30 days from the date of issue.",
    "Warranty: All hardware is covered by the respective manufacturer's warranty. A 1-year warranty on installation services is provided.",
];
