mod clipper_offset_tests;
